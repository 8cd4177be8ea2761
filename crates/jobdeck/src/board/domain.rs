use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for applications tracked on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ApplicationId(pub i64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle stage reported by the automation backend.
///
/// The registry is closed, but the backend may learn statuses before this
/// build does; those decode into [`ApplicationStatus::Unknown`] instead of
/// failing the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    PendingAutomation,
    UserInputNeeded,
    Applied,
    EmailConfirmationReceived,
    InterviewInvited,
    FollowUpReceived,
    Rejected,
    OtherUpdate,
    Failed,
    ManualInterventionRequired,
    Unknown(String),
}

impl ApplicationStatus {
    /// Every status the registry knows, in backend declaration order.
    pub fn known() -> &'static [ApplicationStatus] {
        static KNOWN: [ApplicationStatus; 10] = [
            ApplicationStatus::PendingAutomation,
            ApplicationStatus::UserInputNeeded,
            ApplicationStatus::Applied,
            ApplicationStatus::EmailConfirmationReceived,
            ApplicationStatus::InterviewInvited,
            ApplicationStatus::FollowUpReceived,
            ApplicationStatus::Rejected,
            ApplicationStatus::OtherUpdate,
            ApplicationStatus::Failed,
            ApplicationStatus::ManualInterventionRequired,
        ];
        &KNOWN
    }

    /// Wire form exchanged with the backend.
    pub fn as_str(&self) -> &str {
        match self {
            Self::PendingAutomation => "PENDING_AUTOMATION",
            Self::UserInputNeeded => "USER_INPUT_NEEDED",
            Self::Applied => "APPLIED",
            Self::EmailConfirmationReceived => "EMAIL_CONFIRMATION_RECEIVED",
            Self::InterviewInvited => "INTERVIEW_INVITED",
            Self::FollowUpReceived => "FOLLOW_UP_RECEIVED",
            Self::Rejected => "REJECTED",
            Self::OtherUpdate => "OTHER_UPDATE",
            Self::Failed => "FAILED",
            Self::ManualInterventionRequired => "MANUAL_INTERVENTION_REQUIRED",
            Self::Unknown(raw) => raw,
        }
    }

    /// Human label shown on cards. Unrecognized statuses fall back to the
    /// raw backend string.
    pub fn label(&self) -> &str {
        match self {
            Self::PendingAutomation => "Pending",
            Self::UserInputNeeded => "Needs Input",
            Self::Applied => "Applied",
            Self::EmailConfirmationReceived => "Confirmed",
            Self::InterviewInvited => "Interview",
            Self::FollowUpReceived => "Follow-Up",
            Self::Rejected => "Rejected",
            Self::OtherUpdate => "Other",
            Self::Failed => "Failed",
            Self::ManualInterventionRequired => "Needs Action",
            Self::Unknown(raw) => raw,
        }
    }

    /// Lowercase class token used by the card styling.
    pub fn css_class(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl From<String> for ApplicationStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING_AUTOMATION" => Self::PendingAutomation,
            "USER_INPUT_NEEDED" => Self::UserInputNeeded,
            "APPLIED" => Self::Applied,
            "EMAIL_CONFIRMATION_RECEIVED" => Self::EmailConfirmationReceived,
            "INTERVIEW_INVITED" => Self::InterviewInvited,
            "FOLLOW_UP_RECEIVED" => Self::FollowUpReceived,
            "REJECTED" => Self::Rejected,
            "OTHER_UPDATE" => Self::OtherUpdate,
            "FAILED" => Self::Failed,
            "MANUAL_INTERVENTION_REQUIRED" => Self::ManualInterventionRequired,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::Unknown(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Posting summary nested in every application record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub company_name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Field the automation run could not fill on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingField {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Automation progress carried while an application waits on user input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationState {
    #[serde(default)]
    pub missing_fields: Vec<MissingField>,
    #[serde(default)]
    pub filled_fields: BTreeMap<String, String>,
}

/// Application record as decoded from the automation backend.
///
/// Records are created and deleted only by the backend; the board mutates
/// nothing but the `status` field, and only after server confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub job_posting: JobPosting,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automation_state: Option<AutomationState>,
}

impl Application {
    pub fn awaiting_input(&self) -> bool {
        self.status == ApplicationStatus::UserInputNeeded
    }

    /// Missing fields are only meaningful while the application waits on
    /// user input; any other status reports none.
    pub fn missing_fields(&self) -> &[MissingField] {
        match (&self.status, &self.automation_state) {
            (ApplicationStatus::UserInputNeeded, Some(state)) => &state.missing_fields,
            _ => &[],
        }
    }
}
