use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202601050001_create_admins::Migration),
            Box::new(migrations::m202601050002_create_departments::Migration),
            Box::new(migrations::m202601050003_create_faculty::Migration),
            Box::new(migrations::m202601050004_create_students::Migration),
            Box::new(migrations::m202601050005_create_classes::Migration),
            Box::new(migrations::m202601050006_create_subjects::Migration),
            Box::new(migrations::m202601050007_create_audit_logs::Migration),
        ]
    }
}
