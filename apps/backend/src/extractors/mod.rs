pub mod db_conn;
pub mod db_session;
