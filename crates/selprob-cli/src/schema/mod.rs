pub(crate) mod report;
pub(crate) mod scenario_file;
