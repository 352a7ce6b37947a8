pub mod export_report_route;
pub mod report_request;
