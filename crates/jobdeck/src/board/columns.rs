use super::domain::{Application, ApplicationStatus};

/// Static definition of one board column.
///
/// Columns have no identity beyond this definition; the derived
/// [`BoardColumn`] views are discarded and rebuilt on every distribution
/// pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub statuses: &'static [ApplicationStatus],
}

impl ColumnSpec {
    pub fn owns(&self, status: &ApplicationStatus) -> bool {
        self.statuses.contains(status)
    }

    /// Status written when a card is dropped into this column. Columns own
    /// several statuses in the read direction; writes always pick the first.
    pub fn write_status(&self) -> ApplicationStatus {
        self.statuses[0].clone()
    }
}

static PENDING_STATUSES: [ApplicationStatus; 1] = [ApplicationStatus::PendingAutomation];
static NEEDS_INPUT_STATUSES: [ApplicationStatus; 1] = [ApplicationStatus::UserInputNeeded];
static APPLIED_STATUSES: [ApplicationStatus; 2] = [
    ApplicationStatus::Applied,
    ApplicationStatus::EmailConfirmationReceived,
];
static INTERVIEW_STATUSES: [ApplicationStatus; 2] = [
    ApplicationStatus::InterviewInvited,
    ApplicationStatus::FollowUpReceived,
];
static OTHER_STATUSES: [ApplicationStatus; 1] = [ApplicationStatus::OtherUpdate];
static REJECTED_STATUSES: [ApplicationStatus; 3] = [
    ApplicationStatus::Rejected,
    ApplicationStatus::Failed,
    ApplicationStatus::ManualInterventionRequired,
];

/// Left-to-right board order; fixed across reloads.
pub static TAXONOMY: [ColumnSpec; 6] = [
    ColumnSpec {
        id: "pending",
        title: "Pending",
        icon: "hourglass",
        color: "#f59e0b",
        statuses: &PENDING_STATUSES,
    },
    ColumnSpec {
        id: "needs_input",
        title: "Needs Input",
        icon: "pencil",
        color: "#8b5cf6",
        statuses: &NEEDS_INPUT_STATUSES,
    },
    ColumnSpec {
        id: "applied",
        title: "Applied",
        icon: "paper-plane",
        color: "#2563eb",
        statuses: &APPLIED_STATUSES,
    },
    ColumnSpec {
        id: "interview",
        title: "Interview",
        icon: "calendar",
        color: "#059669",
        statuses: &INTERVIEW_STATUSES,
    },
    ColumnSpec {
        id: "other",
        title: "Offer / Other",
        icon: "star",
        color: "#0891b2",
        statuses: &OTHER_STATUSES,
    },
    ColumnSpec {
        id: "rejected",
        title: "Rejected",
        icon: "archive",
        color: "#dc2626",
        statuses: &REJECTED_STATUSES,
    },
];

/// Look up a column definition by its stable id.
pub fn column_spec(id: &str) -> Option<&'static ColumnSpec> {
    TAXONOMY.iter().find(|spec| spec.id == id)
}

/// The single column owning a status; `None` for statuses outside the
/// registry.
pub fn column_for(status: &ApplicationStatus) -> Option<&'static ColumnSpec> {
    TAXONOMY.iter().find(|spec| spec.owns(status))
}

/// Derived view of one column; rebuilt on every distribution pass, never a
/// source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn {
    pub spec: &'static ColumnSpec,
    pub applications: Vec<Application>,
}
