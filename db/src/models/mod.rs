pub mod admin;
pub mod audit_log;
pub mod class;
pub mod department;
pub mod faculty;
pub mod student;
pub mod subject;

pub use admin::Entity as Admin;
pub use audit_log::Entity as AuditLog;
pub use class::Entity as Class;
pub use department::Entity as Department;
pub use faculty::Entity as Faculty;
pub use student::Entity as Student;
pub use subject::Entity as Subject;
