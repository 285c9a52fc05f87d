mod common;
mod report;
mod routing;
mod service;
