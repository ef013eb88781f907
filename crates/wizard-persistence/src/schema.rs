// Esquema Diesel (SQLite).
// Tablas: wizard_states
diesel::table! {
    wizard_states (id) {
        id -> Text,
        payload -> Text,
        updated_at_ts -> BigInt,
    }
}
