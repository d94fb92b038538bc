use crate::models::user::User;
use diesel::prelude::*;

#[derive(Queryable, Identifiable, Selectable, Associations)]
#[diesel(belongs_to(User))]
#[diesel(table_name = crate::schema::profiles)]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct Profile {
    pub id: i32,
    pub user_id: i32,
    pub block: bool,
}
