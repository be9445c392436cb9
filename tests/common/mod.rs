//! Shared fixtures and helpers for integration tests.

#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

/// Roster with one member per matching strategy worth exercising.
///
/// - `u-ana`: full profile, reachable by uid, slug, name and normalized name
/// - `u-juan`: reachable through the disambiguation suffix ("Juan Pérez2")
/// - `u-maria`: only first/last name, reachable by surname + initial
pub const ROSTER: &str = r#"[
  {"uid": "u-ana", "displayName": "Ana García", "slug": "ana-garcia", "orcid": "0000-0001-2345-6789", "publicEmail": "ana@example.org", "firstName": "Ana", "lastName": "García"},
  {"uid": "u-juan", "displayName": "Juan Pérez", "slug": "juan-perez"},
  {"uid": "u-maria", "firstName": "María", "lastName": "Soto", "slug": "maria-soto"}
]"#;

/// Two-article catalog.
///
/// The first article pins its first author by uid; the second mixes a
/// structured author, a suffixed name and an author missing from the roster.
pub const CATALOG: &str = r#"[
  {
    "titulo": "Análisis de Datos Climáticos",
    "tituloEnglish": "Climate Data Analysis",
    "fecha": "2024-05-01",
    "autores": "Ana García; Pedro Ruiz",
    "authorIds": ["u-ana", null],
    "numeroArticulo": 7,
    "volumen": 2,
    "numero": 1,
    "primeraPagina": 10,
    "ultimaPagina": 25
  },
  {
    "titulo": "Química de Suelos",
    "fecha": "2023-11-20",
    "autores": [{"firstName": "M.", "lastName": "Soto"}, "Juan Pérez2", "Eva Lind"],
    "numeroArticulo": "3",
    "volumen": "1",
    "numero": "2",
    "primeraPagina": "5",
    "ultimaPagina": "9"
  }
]"#;

/// Creates a temporary file with `content` and the given extension.
pub fn create_temp_file(content: &str, extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(extension)
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
