pub mod database_account_resolver;
pub mod jwt_verifier;

use diesel::{
    MysqlConnection,
    r2d2::{ConnectionManager, Pool},
};

pub type DbPool = Pool<ConnectionManager<MysqlConnection>>;
