use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// A single overwritable status line. Messages are padded to the widest line
/// emitted so far so a shorter update fully overwrites a longer one, and the
/// line is erased when the run ends so the summary starts on a clean line.
pub struct StatusLine {
    pb: ProgressBar,
    widest: usize,
}

impl StatusLine {
    pub fn stdout() -> Self {
        let pb = ProgressBar::new(0);
        pb.set_draw_target(ProgressDrawTarget::stdout());
        pb.set_style(ProgressStyle::default_bar().template("{msg}").unwrap());
        Self { pb, widest: 0 }
    }

    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
            widest: 0,
        }
    }

    pub fn update(&mut self, line: &str) {
        self.widest = self.widest.max(line.chars().count());
        self.pb
            .set_message(format!("{:<width$}", line, width = self.widest));
    }

    /// Prints a full line above the status line without corrupting it.
    pub fn println(&self, line: &str) {
        self.pb.println(line);
    }

    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }
}

impl Drop for StatusLine {
    fn drop(&mut self) {
        self.pb.finish_and_clear();
    }
}

pub fn attempt_line(idx: usize, total: usize, candidate: &str) -> String {
    let width = total.to_string().len();
    format!("({idx:0width$}/{total}) Checked {candidate}")
}
