//! Orchestrates one update: classify, plan actions, execute them in order.

use tracing::{debug, error, warn};

use super::actions::{ActionPlan, OutboundAction};
use super::auth::OwnerGuard;
use super::callback_data::{CallbackData, CallbackKind};
use super::classifier::{classify, Classification};
use super::commands::Command;
use super::errors::DispatchError;
use super::modules::{account, codec, echo, group_guard, help, link_preview, site_status, welcome};
use super::services::link_info::Enricher;
use super::services::status_store::{StatusBackend, StatusStore};
use super::services::telegram_api::Gateway;
use super::update::{CallbackPress, InboundUpdate, IncomingMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    Ok,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub status: DispatchStatus,
}

pub struct Dispatcher<B, G, E> {
    store: StatusStore<B>,
    guard: OwnerGuard,
    gateway: G,
    enricher: E,
}

impl<B, G, E> Dispatcher<B, G, E>
where
    B: StatusBackend,
    G: Gateway,
    E: Enricher,
{
    pub fn new(store: StatusStore<B>, guard: OwnerGuard, gateway: G, enricher: E) -> Self {
        Self {
            store,
            guard,
            gateway,
            enricher,
        }
    }

    #[cfg(test)]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Builds the ordered action list for `update`.
    ///
    /// Stages run welcome, command, auto-detect, callback, group guard, echo.
    /// A failing stage is recorded and the remaining stages still run.
    pub async fn plan(&self, update: &InboundUpdate) -> (ActionPlan, Vec<DispatchError>) {
        let classification = classify(update);
        if classification.is_empty() {
            debug!("Nothing to do for update from {:?}", update.actor());
        }

        let mut plan = ActionPlan::new();
        let mut faults = Vec::new();

        if let Some(message) = update.message() {
            self.plan_message(message, &classification, &mut plan).await;
        }

        if let (Some(press), Some(kind)) = (update.callback(), &classification.callback) {
            if let Err(err) = self.plan_callback(press, kind, &mut plan).await {
                plan.push(OutboundAction::answer(&press.id, None));
                faults.push(err);
            }
        }

        if let Some(message) = update.message() {
            if classification.group_guard {
                match group_guard::delete_link_message(message) {
                    Ok(action) => plan.push(action),
                    Err(err) => faults.push(err),
                }
            }

            if classification.echo {
                plan.push(echo::echo(message));
            }
        }

        (plan, faults)
    }

    async fn plan_message(
        &self,
        message: &IncomingMessage,
        classification: &Classification<'_>,
        plan: &mut ActionPlan,
    ) {
        let chat = &message.chat.id;

        welcome::welcome_members(chat, classification.welcome, plan);

        if let Some(command) = &classification.command {
            let action = match command {
                Command::Start => site_status::start(&self.store, &self.guard, message).await,
                Command::Id => account::user_id(message),
                Command::Status(arg) => {
                    site_status::set_status(&self.store, &self.guard, message, arg).await
                }
                Command::Encode(raw) => codec::encode(chat, raw),
                Command::Decode(raw) => codec::decode(chat, raw),
                Command::Short(raw) => codec::short(&self.enricher, chat, raw).await,
            };
            plan.push(action);
        }

        if let Some(link) = classification.tracked_link {
            plan.push(link_preview::preview(&self.enricher, chat, link).await);
        }
    }

    async fn plan_callback(
        &self,
        press: &CallbackPress,
        kind: &CallbackKind,
        plan: &mut ActionPlan,
    ) -> Result<(), DispatchError> {
        let data = match kind {
            CallbackKind::Known(v) => v,
            CallbackKind::Unknown(data) => {
                debug!("Unknown callback data {data:?}");
                plan.push(OutboundAction::answer(&press.id, None));
                return Ok(());
            }
        };

        if let Some(target) = data.site_target() {
            site_status::toggle(&self.store, &self.guard, press, target, plan).await;
            return Ok(());
        }

        if let Some(text) = help::help_text(data) {
            return help::show_help(&self.store, &self.guard, press, text, plan).await;
        }

        match data {
            CallbackData::CheckId => account::check_id(&self.gateway, press, plan).await,
            CallbackData::CopyId { id } => account::copy_id(press, id, plan),
            _ => {
                plan.push(OutboundAction::answer(&press.id, None));
                Ok(())
            }
        }
    }

    /// Handles one update end to end. Gateway failures are logged and do not
    /// change the result; planning faults turn it into `Degraded`.
    pub async fn handle(&self, update: &InboundUpdate) -> DispatchResult {
        let (plan, faults) = self.plan(update).await;

        for fault in faults.iter() {
            error!("Dispatch fault: {fault}");
        }

        for action in plan.iter() {
            if let Err(err) = self.gateway.execute(action).await {
                warn!("{} failed: {err}", action.method());
            }
        }

        let status = if faults.is_empty() {
            DispatchStatus::Ok
        } else {
            DispatchStatus::Degraded
        };

        DispatchResult { status }
    }
}
