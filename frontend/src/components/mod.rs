pub mod invite_sender;
