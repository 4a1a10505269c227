pub(crate) mod participant;

pub(crate) use participant::Participant;
