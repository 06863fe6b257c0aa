pub mod appointment;
pub mod doctor;
pub mod enums;
pub mod specialty;
pub mod user;

pub use appointment::Appointment;
pub use doctor::Doctor;
pub use enums::AppointmentStatus;
pub use specialty::Specialty;
pub use user::User;
