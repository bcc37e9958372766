/// Schema-level CRUD checks against a live Postgres
pub mod crud_tests;
