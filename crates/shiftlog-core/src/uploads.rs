const UNITS: [&str; 4] =
  ["B", "KB", "MB", "GB"];

/// Base-1024 size with one decimal
/// place; sizes past the last unit stay
/// in GB.
pub fn format_file_size(
  bytes: u64
) -> String {
  if bytes == 0 {
    return "0 B".to_string();
  }

  let mut unit = 0_usize;
  while unit + 1 < UNITS.len()
    && bytes >= 1024_u64.pow(unit as u32 + 1)
  {
    unit += 1;
  }

  let scaled = bytes as f64
    / 1024_f64.powi(unit as i32);
  format!("{scaled:.1} {}", UNITS[unit])
}

/// The single file picked on an upload
/// input, held until submit or removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSelection {
  pub name: String,
  pub size: u64
}

impl UploadSelection {
  pub fn size_label(&self) -> String {
    format_file_size(self.size)
  }

  pub fn summary(&self) -> String {
    format!(
      "{} ({})",
      self.name,
      self.size_label()
    )
  }
}
