/// Everything the poll loop remembers between iterations.
///
/// Lives only in memory: a restart starts from an empty last message and a
/// fresh cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    /// `from_date` for the next request (unix seconds).
    pub cursor: i64,
    /// Text of the last notification that was actually delivered.
    pub last_message: String,
    pub total_polls: u64,
    pub total_sent: u64,
}

impl PollState {
    /// Start with a cursor one poll interval in the past.
    pub fn new(now: i64, poll_interval_secs: u64) -> Self {
        let interval = i64::try_from(poll_interval_secs).unwrap_or(i64::MAX);
        Self {
            cursor: now.saturating_sub(interval),
            last_message: String::new(),
            total_polls: 0,
            total_sent: 0,
        }
    }

    /// Whether `message` differs from the last delivered one.
    pub fn is_new(&self, message: &str) -> bool {
        self.last_message != message
    }

    /// Record a delivered notification.
    pub fn mark_sent(&mut self, message: String) {
        self.last_message = message;
        self.total_sent += 1;
    }

    /// Move the cursor to a server-reported date.
    pub fn advance_cursor(&mut self, current_date: Option<i64>) {
        if let Some(date) = current_date {
            self.cursor = date;
        }
    }
}
