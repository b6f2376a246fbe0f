//! Wires every service from a store bundle, a mailer and the config.

use std::sync::Arc;

use lifeshare_core::config::AppConfig;
use lifeshare_core::traits::Mailer;
use lifeshare_database::Repositories;

use crate::admin::AdminReadModels;
use crate::donation::DonationService;
use crate::hospital::HospitalService;
use crate::inventory::{ExpiryService, InventoryService};
use crate::lifecycle::{
    AppointmentService, CompletionService, RequestService, ResponseService,
};
use crate::matching::MatchingService;
use crate::notification::{NotificationDispatcher, NotificationService};
use crate::reminder::ReminderService;

/// The full set of services shared by the API and the worker.
#[derive(Debug, Clone)]
pub struct Services {
    pub dispatcher: NotificationDispatcher,
    pub matching: Arc<MatchingService>,
    pub requests: Arc<RequestService>,
    pub responses: Arc<ResponseService>,
    pub appointments: Arc<AppointmentService>,
    pub completion: Arc<CompletionService>,
    pub inventory: Arc<InventoryService>,
    pub expiry: Arc<ExpiryService>,
    pub reminders: Arc<ReminderService>,
    pub donations: Arc<DonationService>,
    pub notifications: Arc<NotificationService>,
    pub hospitals: Arc<HospitalService>,
    pub admin: Arc<AdminReadModels>,
}

impl Services {
    pub fn new(repos: &Repositories, mailer: Arc<dyn Mailer>, config: &AppConfig) -> Self {
        let dispatcher = NotificationDispatcher::new(
            repos.notifications.clone(),
            mailer,
            &config.notifications,
        );
        let matching = MatchingService::new(
            repos.users.clone(),
            repos.requests.clone(),
            dispatcher.clone(),
        );

        let requests = RequestService::new(
            repos.requests.clone(),
            repos.hospitals.clone(),
            repos.users.clone(),
            repos.matches.clone(),
            dispatcher.clone(),
            matching.clone(),
            &config.notifications,
            &config.lifecycle,
        );
        let responses = ResponseService::new(
            repos.responses.clone(),
            repos.requests.clone(),
            repos.hospitals.clone(),
            repos.users.clone(),
            repos.matches.clone(),
            dispatcher.clone(),
        );
        let appointments = AppointmentService::new(
            repos.appointments.clone(),
            repos.hospitals.clone(),
            repos.requests.clone(),
            repos.users.clone(),
            repos.ledger.clone(),
            repos.audit.clone(),
            dispatcher.clone(),
        );
        let completion = CompletionService::new(
            repos.requests.clone(),
            repos.users.clone(),
            repos.ledger.clone(),
            dispatcher.clone(),
        );
        let inventory = InventoryService::new(
            repos.inventory.clone(),
            repos.audit.clone(),
            dispatcher.clone(),
            &config.lifecycle,
        );
        let expiry = ExpiryService::new(
            repos.inventory.clone(),
            repos.users.clone(),
            repos.hospitals.clone(),
            repos.notifications.clone(),
            dispatcher.clone(),
            &config.lifecycle,
        );
        let reminders = ReminderService::new(
            repos.users.clone(),
            dispatcher.clone(),
            &config.lifecycle,
        );

        Self {
            matching: Arc::new(matching),
            requests: Arc::new(requests),
            responses: Arc::new(responses),
            appointments: Arc::new(appointments),
            completion: Arc::new(completion),
            inventory: Arc::new(inventory),
            expiry: Arc::new(expiry),
            reminders: Arc::new(reminders),
            donations: Arc::new(DonationService::new(repos.donations.clone())),
            notifications: Arc::new(NotificationService::new(repos.notifications.clone())),
            hospitals: Arc::new(HospitalService::new(
                repos.hospitals.clone(),
                repos.audit.clone(),
            )),
            admin: Arc::new(AdminReadModels::new(
                repos.users.clone(),
                repos.requests.clone(),
                repos.responses.clone(),
                repos.donations.clone(),
                repos.inventory.clone(),
                config.lifecycle.completed_matches_limit,
                config.lifecycle.low_stock_threshold,
            )),
            dispatcher,
        }
    }
}
