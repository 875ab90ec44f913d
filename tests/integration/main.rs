mod common;
mod health_test;
mod trip_plan_test;
