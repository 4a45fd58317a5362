// SPDX-FileCopyrightText: 2026 Folio contributors
// SPDX-License-Identifier: MIT

//! Database schema definitions for the library catalog.

/// Catalog schema SQL (Authors, Books)
pub const SCHEMA_SQL: &str = r#"
create table if not exists Authors (
    id        integer primary key autoincrement not null,
    name      text not null,
    birthDate text not null,
    country   text not null
);

create index if not exists IndexAuthorName on Authors(name);
create index if not exists IndexAuthorCountry on Authors(country);

create table if not exists Books (
    id            integer primary key autoincrement not null,
    title         text not null,
    publishedDate text not null,
    author        integer not null,
    foreign key (author) references Authors(id) on delete cascade
);

create index if not exists IndexBookAuthor on Books(author);
"#;

/// Schema version
pub const SCHEMA_VERSION: i32 = 1;
