mod account;
mod event;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "protestpulse",
    "m0001",
    vec_box![],
    vec_box![
        account::CreateTable,
        account::CreateUk1,
        event::CreateTable,
        event::CreateIdx1
    ]
);
