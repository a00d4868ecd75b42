use crate::{
    api::{leave, shift},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-scope limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let api_limiter = build_limiter(config.rate_api_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter)
            .service(
                web::scope("/leave")
                    // /leave
                    .service(web::resource("").route(web::post().to(leave::submit_leave)))
                    // /leave/approve
                    .service(
                        web::resource("/approve").route(web::put().to(leave::approve_leave)),
                    )
                    // /leave/reject
                    .service(web::resource("/reject").route(web::put().to(leave::reject_leave)))
                    // /leave/{employee_number}
                    .service(
                        web::resource("/{employee_number}")
                            .route(web::get().to(leave::leave_history)),
                    ),
            )
            .service(
                web::scope("/shift")
                    // /shift
                    .service(web::resource("").route(web::post().to(shift::create_shift)))
                    // /shift/assign
                    .service(web::resource("/assign").route(web::post().to(shift::assign_shift)))
                    // /shift/company/{company_id}
                    .service(
                        web::resource("/company/{company_id}")
                            .route(web::get().to(shift::company_shifts)),
                    )
                    // /shift/employee/{employee_id}
                    .service(
                        web::resource("/employee/{employee_id}")
                            .route(web::get().to(shift::employee_assignments)),
                    )
                    // /shift/break/{id}
                    .service(
                        web::resource("/break/{id}")
                            .route(web::put().to(shift::update_break))
                            .route(web::delete().to(shift::delete_break)),
                    )
                    // /shift/{id}/break
                    .service(
                        web::resource("/{id}/break")
                            .route(web::post().to(shift::create_break))
                            .route(web::get().to(shift::shift_breaks)),
                    )
                    // /shift/{id}  (keep last so the fixed segments above win)
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(shift::update_shift))
                            .route(web::delete().to(shift::delete_shift)),
                    ),
            ),
    );
}
