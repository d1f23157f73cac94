pub(crate) mod control;
pub(crate) mod dirty;
pub(crate) mod parcel;
pub(crate) mod perform;
pub(crate) mod slots;
pub(crate) mod swap_chain;
pub(crate) mod window;
