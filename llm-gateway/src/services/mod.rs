pub mod invoke_service;
