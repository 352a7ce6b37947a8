pub mod webhook_service;
