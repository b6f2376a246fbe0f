//! Subjects and bodies for each mail template.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lifeshare_core::result::AppResult;
use lifeshare_core::traits::{MailMessage, MailTemplate};

/// Subject of the donor re-engagement reminder.
pub const DONATION_REMINDER_SUBJECT: &str = "Blood Donation Reminder - Your Help is Needed!";
/// Subject of the new-request alert sent to matching donors.
pub const BLOOD_REQUEST_SUBJECT: &str = "Urgent Blood Request - Your Blood Type is Needed!";

/// Payload of [`MailTemplate::DonationReminder`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationReminderPayload {
    pub blood_group: Option<String>,
    pub last_donation_date: DateTime<Utc>,
    pub days_since_last_donation: i64,
}

/// Payload of [`MailTemplate::BloodRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodRequestPayload {
    pub blood_group: String,
    pub units_needed: i32,
    pub urgency: String,
    pub hospital_name: String,
    pub hospital_address: Option<String>,
    pub patient_name: Option<String>,
    pub required_date: Option<DateTime<Utc>>,
}

/// Payload of [`MailTemplate::ExpiryReminder`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiryReminderPayload {
    /// `"Blood"` or `"Plasma"`.
    pub kind_label: String,
    pub blood_group: String,
    pub units_available: i32,
    pub hospital_name: String,
    pub expiry_date: DateTime<Utc>,
}

/// A message ready for a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMail {
    pub subject: String,
    pub text: String,
}

/// Render `message` with its template.
pub fn render(message: &MailMessage) -> AppResult<RenderedMail> {
    let greeting = format!("Dear {},", message.recipient_name);
    match message.template {
        MailTemplate::DonationReminder => {
            let p: DonationReminderPayload = serde_json::from_value(message.payload.clone())?;
            let group = p
                .blood_group
                .map(|g| format!(" Donors with blood group {g} are always in demand."))
                .unwrap_or_default();
            Ok(RenderedMail {
                subject: DONATION_REMINDER_SUBJECT.to_string(),
                text: format!(
                    "{greeting}\n\nIt has been {} days since your last donation on {}. \
                     You are eligible to donate again and patients are counting on you.{group}\n\n\
                     Book an appointment at a hospital near you.\n\nThank you,\nLifeShare",
                    p.days_since_last_donation,
                    p.last_donation_date.format("%d %b %Y"),
                ),
            })
        }
        MailTemplate::BloodRequest => {
            let p: BloodRequestPayload = serde_json::from_value(message.payload.clone())?;
            let mut lines = vec![
                format!("Blood group: {}", p.blood_group),
                format!("Units needed: {}", p.units_needed),
                format!("Urgency: {}", p.urgency),
                format!("Hospital: {}", p.hospital_name),
            ];
            if let Some(address) = p.hospital_address {
                lines.push(format!("Address: {address}"));
            }
            if let Some(patient) = p.patient_name {
                lines.push(format!("Patient: {patient}"));
            }
            if let Some(date) = p.required_date {
                lines.push(format!("Required by: {}", date.format("%d %b %Y")));
            }
            Ok(RenderedMail {
                subject: BLOOD_REQUEST_SUBJECT.to_string(),
                text: format!(
                    "{greeting}\n\nA patient needs your blood type.\n\n{}\n\n\
                     Sign in to accept the request.\n\nThank you,\nLifeShare",
                    lines.join("\n")
                ),
            })
        }
        MailTemplate::ExpiryReminder => {
            let p: ExpiryReminderPayload = serde_json::from_value(message.payload.clone())?;
            Ok(RenderedMail {
                subject: format!(
                    "Urgent: {} Unit Expiring Soon - Action Required",
                    p.kind_label
                ),
                text: format!(
                    "{greeting}\n\n{} units of {} {} at {} expire on {}. \
                     Please use or redistribute them before expiry.\n\nLifeShare",
                    p.units_available,
                    p.blood_group,
                    p.kind_label.to_lowercase(),
                    p.hospital_name,
                    p.expiry_date.format("%d %b %Y %H:%M UTC"),
                ),
            })
        }
    }
}
