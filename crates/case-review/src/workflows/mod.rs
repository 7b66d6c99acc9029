pub mod status_update;
