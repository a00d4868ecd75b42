pub mod company;
pub mod employee;
pub mod leave;
pub mod shift;

pub use company::Company;
pub use employee::Employee;
pub use leave::{LeaveRequest, LeaveStatus, LeaveType};
pub use shift::{Break, EmployeeShift, Shift};
