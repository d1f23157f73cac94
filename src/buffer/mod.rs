pub(crate) mod copy;
pub(crate) mod graphic_buffer;
pub(crate) mod info;
pub(crate) mod mapper;
