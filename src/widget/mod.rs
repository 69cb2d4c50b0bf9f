pub(crate) mod intent;
pub(crate) mod prefs;
pub(crate) mod state;
pub(crate) mod update;
