pub mod json_repo;

mod json_repo_tests;
