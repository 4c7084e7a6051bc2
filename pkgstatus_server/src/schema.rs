//! Diesel table definitions for the build farm record store.
//!
//! Tables: builds, ports, servers. Rows are written by the build farm
//! agents; this server only reads them. Loosely structured sub-documents
//! (job state, snapshots, per-origin outcomes) are stored as JSONB.

diesel::table! {
    builds (id) {
        id -> Varchar,
        #[sql_name = "type"]
        build_type -> Varchar,
        setname -> Varchar,
        ptname -> Varchar,
        jailname -> Varchar,
        buildname -> Varchar,
        server -> Varchar,
        started -> Int8,
        latest -> Bool,
        status -> Nullable<Varchar>,
        stats -> Nullable<Jsonb>,
        jobs -> Nullable<Jsonb>,
        snap -> Nullable<Jsonb>,
    }
}

diesel::table! {
    ports (id) {
        id -> Varchar,
        pkgnames -> Nullable<Jsonb>,
        built -> Nullable<Jsonb>,
        failed -> Nullable<Jsonb>,
        skipped -> Nullable<Jsonb>,
        ignored -> Nullable<Jsonb>,
    }
}

diesel::table! {
    servers (id) {
        id -> Varchar,
        host -> Varchar,
        masternames -> Nullable<Jsonb>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(builds, ports, servers);
