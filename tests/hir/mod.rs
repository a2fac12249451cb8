mod tests_diagnostics;
mod tests_import_resolution;
mod tests_name_resolution;
