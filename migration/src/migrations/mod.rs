pub mod m202601050001_create_admins;
pub mod m202601050002_create_departments;
pub mod m202601050003_create_faculty;
pub mod m202601050004_create_students;
pub mod m202601050005_create_classes;
pub mod m202601050006_create_subjects;
pub mod m202601050007_create_audit_logs;
