use std::path::PathBuf;

use tempfile::TempDir;

/// Attendance headers used by [`UnitTestFixture::create_gradebook`].
pub const ATTENDANCE_HEADERS: [&str; 6] = [
    "9-3 (101)",
    "9-5 (102)",
    "9-10 (103)",
    "9-12 (104)",
    "9-17 (105)",
    "9-19 (106)",
];

/// Test fixture providing isolated filesystem environment.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTestFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();

        println!("[FIXTURE] Created temp directory: {data_path:?}");

        Self {
            temp_dir,
            data_path,
        }
    }

    /// Create a test file with content.
    #[must_use]
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }

    /// Create a gradebook export with a points-possible row and one row per
    /// `(student, sis_id, confirmed_attendances)`.
    #[must_use]
    pub fn create_gradebook(&self, relative_path: &str, rows: &[(&str, &str, usize)]) -> PathBuf {
        let mut csv = format!("Student,ID,SIS User ID,{}\n", ATTENDANCE_HEADERS.join(","));
        csv.push_str("    Points Possible,,,");
        csv.push_str(&vec!["1.00"; ATTENDANCE_HEADERS.len()].join(","));
        csv.push('\n');
        for (idx, (student, sis_id, attended)) in rows.iter().enumerate() {
            let cells: Vec<&str> = (0..ATTENDANCE_HEADERS.len())
                .map(|day| if day < *attended { "1.00" } else { "0.00" })
                .collect();
            csv.push_str(&format!(
                "\"{student}\",{},{sis_id},{}\n",
                idx + 100,
                cells.join(",")
            ));
        }
        self.create_file(relative_path, &csv)
    }
}

impl Drop for UnitTestFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.data_path);
    }
}
