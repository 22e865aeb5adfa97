pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20250601_000001_initial_tables;
mod m20250601_000002_relax_visitor_constraints;

pub use m20250601_000002_relax_visitor_constraints::{
    LegacyVisitorRow, RelaxedVisitorRow, has_legacy_visitor_constraints, relax_visitor_row,
};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_initial_tables::Migration),
            Box::new(m20250601_000002_relax_visitor_constraints::Migration),
        ]
    }
}
