use super::update::ActorIdentity;

/// Single-owner allow list. Denial is an ordinary answer, never an error.
#[derive(Debug, Clone)]
pub struct OwnerGuard {
    owner: ActorIdentity,
}

impl OwnerGuard {
    pub fn new<T: AsRef<str>>(owner: T) -> Self {
        Self {
            owner: ActorIdentity::new(owner),
        }
    }

    pub fn is_owner(&self, actor: Option<&ActorIdentity>) -> bool {
        match actor {
            Some(actor) => !self.owner.as_str().is_empty() && *actor == self.owner,
            None => false,
        }
    }
}
