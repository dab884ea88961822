use crate::bot::actions::{ActionPlan, OutboundAction};
use crate::bot::strings::format_welcome;
use crate::bot::update::{ChatIdentity, Person};

pub fn welcome_members(chat: &ChatIdentity, members: &[Person], plan: &mut ActionPlan) {
    plan.extend(
        members
            .iter()
            .map(|m| OutboundAction::text(chat.clone(), format_welcome(m.first_name.as_deref()))),
    );
}
