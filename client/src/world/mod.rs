pub(crate) mod local_avatar;
pub(crate) mod object_view;
pub(crate) mod remote_entity;
