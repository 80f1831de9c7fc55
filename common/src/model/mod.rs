pub mod attachment;
pub mod link;
pub mod recipient;
pub mod template;
