use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the channel is gone.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!(error = %e, "Dropping domain event");
        }
    }
}

/// Things that happened in the shop, consumed by [`process_events`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    JobCardCreated {
        id: Uuid,
        job_no: String,
        estimated_cost: Decimal,
    },
    JobCardStatusChanged {
        id: Uuid,
        old_status: String,
        new_status: String,
    },
    JobCardDeleted(Uuid),
    RollStockConsumed {
        ppf_id: Uuid,
        roll_id: Uuid,
        used: Decimal,
        remaining: Decimal,
    },
    InvoiceGenerated {
        id: Uuid,
        invoice_no: String,
        total: Decimal,
    },
    InquiryCreated {
        id: Uuid,
        inquiry_id: String,
    },
    AppointmentCancelled {
        id: Uuid,
        reason: Option<String>,
    },
    UserLoggedIn {
        user_id: Uuid,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::JobCardCreated { .. } => "job_card_created",
            Event::JobCardStatusChanged { .. } => "job_card_status_changed",
            Event::JobCardDeleted(_) => "job_card_deleted",
            Event::RollStockConsumed { .. } => "roll_stock_consumed",
            Event::InvoiceGenerated { .. } => "invoice_generated",
            Event::InquiryCreated { .. } => "inquiry_created",
            Event::AppointmentCancelled { .. } => "appointment_cancelled",
            Event::UserLoggedIn { .. } => "user_logged_in",
        }
    }
}

/// Stock left on a roll below which a warning is logged
const LOW_ROLL_STOCK: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

// Drains the channel until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        counter!("autogarage_events_total", 1, "event" => event.name());

        match &event {
            Event::JobCardCreated {
                id,
                job_no,
                estimated_cost,
            } => {
                info!(job_card_id = %id, job_no = %job_no, estimated_cost = %estimated_cost, "Job card created");
            }
            Event::JobCardStatusChanged {
                id,
                old_status,
                new_status,
            } => {
                info!(job_card_id = %id, from = %old_status, to = %new_status, "Job card status changed");
            }
            Event::RollStockConsumed {
                ppf_id,
                roll_id,
                used,
                remaining,
            } => {
                if *remaining < LOW_ROLL_STOCK {
                    warn!(ppf_id = %ppf_id, roll_id = %roll_id, remaining = %remaining, "PPF roll running low");
                } else {
                    info!(ppf_id = %ppf_id, roll_id = %roll_id, used = %used, "PPF roll stock consumed");
                }
            }
            Event::InvoiceGenerated {
                id,
                invoice_no,
                total,
            } => {
                info!(invoice_id = %id, invoice_no = %invoice_no, total = %total, "Invoice generated");
            }
            other => info!(event = ?other, "Domain event"),
        }
    }

    info!("Event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sender_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        let id = Uuid::new_v4();
        sender.send(Event::JobCardDeleted(id)).await.unwrap();
        assert_eq!(rx.recv().await, Some(Event::JobCardDeleted(id)));
    }

    #[tokio::test]
    async fn processing_loop_ends_when_senders_drop() {
        let (tx, rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        sender
            .send(Event::InquiryCreated {
                id: Uuid::new_v4(),
                inquiry_id: "INQ-1".into(),
            })
            .await
            .unwrap();
        drop(sender);
        process_events(rx).await;
    }

    #[tokio::test]
    async fn send_or_log_tolerates_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        EventSender::new(tx)
            .send_or_log(Event::JobCardDeleted(Uuid::nil()))
            .await;
    }

    #[test]
    fn low_stock_threshold_is_ten() {
        assert_eq!(LOW_ROLL_STOCK, Decimal::from(10));
    }
}
