//! Field validation and name normalization, applied before any mutation.

use unicode_normalization::UnicodeNormalization;

use crate::config::{MAX_EDAD, MIN_EDAD};
use crate::error::GraphError;
use crate::models::{HobbyCambio, NuevoUsuario, Usuario};

/// Lowercase `text` and strip diacritics ("Rodrigó Pérez" -> "rodrigo perez").
///
/// Runs NFKD decomposition and keeps the ASCII part, so characters with no
/// ASCII base letter are dropped. Surrounding whitespace is trimmed.
pub fn normalize_text(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .nfkd()
        .filter(char::is_ascii)
        .collect()
}

fn normalized_name(field: &'static str, value: &str) -> Result<String, GraphError> {
    let normalized = normalize_text(value);
    if normalized.trim().is_empty() {
        return Err(GraphError::validation(
            field,
            "must not be empty or whitespace only",
        ));
    }
    Ok(normalized)
}

pub fn validate_edad(edad: i64) -> Result<(), GraphError> {
    if !(MIN_EDAD..=MAX_EDAD).contains(&edad) {
        return Err(GraphError::validation(
            "edad",
            format!("{} is outside {}..={}", edad, MIN_EDAD, MAX_EDAD),
        ));
    }
    Ok(())
}

pub fn validate_coordinates(latitud: f64, longitud: f64) -> Result<(), GraphError> {
    if !latitud.is_finite() || !(-90.0..=90.0).contains(&latitud) {
        return Err(GraphError::validation(
            "latitud",
            format!("{} is outside [-90, 90]", latitud),
        ));
    }
    if !longitud.is_finite() || !(-180.0..=180.0).contains(&longitud) {
        return Err(GraphError::validation(
            "longitud",
            format!("{} is outside [-180, 180]", longitud),
        ));
    }
    Ok(())
}

pub fn validate_hobby_id(hobby_id: i64) -> Result<(), GraphError> {
    if hobby_id < 1 {
        return Err(GraphError::validation("hobby_id", "must be at least 1"));
    }
    Ok(())
}

/// Validate a creation request and return it with normalized names.
pub fn validate_nuevo(nuevo: &NuevoUsuario) -> Result<NuevoUsuario, GraphError> {
    let nombre = normalized_name("nombre", &nuevo.nombre)?;
    let apellidos = normalized_name("apellidos", &nuevo.apellidos)?;
    validate_edad(nuevo.edad)?;
    validate_coordinates(nuevo.latitud, nuevo.longitud)?;
    if let Some(hobby_id) = nuevo.hobby_id {
        validate_hobby_id(hobby_id)?;
    }

    Ok(NuevoUsuario {
        nombre,
        apellidos,
        ..nuevo.clone()
    })
}

/// Validate a user after changes were applied and return it normalized.
pub fn validate_usuario(usuario: &Usuario, hobby: HobbyCambio) -> Result<Usuario, GraphError> {
    let nombre = normalized_name("nombre", &usuario.nombre)?;
    let apellidos = normalized_name("apellidos", &usuario.apellidos)?;
    validate_edad(usuario.edad)?;
    validate_coordinates(usuario.latitud, usuario.longitud)?;
    if let HobbyCambio::Set(hobby_id) = hobby {
        validate_hobby_id(hobby_id)?;
    }

    Ok(Usuario {
        nombre,
        apellidos,
        ..usuario.clone()
    })
}

/// Check `value` against an inclusive range of an analysis parameter.
pub fn validate_range(
    field: &'static str,
    value: usize,
    min: usize,
    max: usize,
) -> Result<(), GraphError> {
    if !(min..=max).contains(&value) {
        return Err(GraphError::validation(
            field,
            format!("{} is outside {}..={}", value, min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents_and_case() {
        assert_eq!(normalize_text("Rodrigó Pérez"), "rodrigo perez");
        assert_eq!(normalize_text("  NÚÑEZ "), "nunez");
        assert_eq!(normalize_text("Çelia Müller"), "celia muller");
    }

    #[test]
    fn test_normalize_decomposes_central_european_letters() {
        assert_eq!(normalize_text("Dvořák"), "dvorak");
        assert_eq!(normalize_text("Šebastién"), "sebastien");
        assert_eq!(normalize_text("Żółkiewska"), "zokiewska");
        assert_eq!(normalize_text("Čapek Žižek"), "capek zizek");
        assert_ne!(normalize_text("Šebastián"), normalize_text("Ebastian"));
    }

    #[test]
    fn test_normalize_drops_non_latin() {
        assert_eq!(normalize_text("ana李"), "ana");
    }

    #[test]
    fn test_edad_bounds() {
        assert!(validate_edad(12).is_ok());
        assert!(validate_edad(150).is_ok());
        assert!(validate_edad(11).is_err());
        assert!(validate_edad(151).is_err());
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(90.5, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.1).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_validate_nuevo_normalizes() {
        let nuevo = NuevoUsuario::new("  José ", "Álvarez", 40, 1.0, 2.0).with_hobby(3);
        let valid = validate_nuevo(&nuevo).unwrap();
        assert_eq!(valid.nombre, "jose");
        assert_eq!(valid.apellidos, "alvarez");
        assert_eq!(valid.hobby_id, Some(3));
    }

    #[test]
    fn test_validate_nuevo_rejects_blank_name() {
        let nuevo = NuevoUsuario::new("   ", "x", 40, 1.0, 2.0);
        match validate_nuevo(&nuevo) {
            Err(GraphError::Validation { field, .. }) => assert_eq!(field, "nombre"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_validate_nuevo_rejects_bad_hobby_id() {
        let nuevo = NuevoUsuario::new("a", "b", 40, 1.0, 2.0).with_hobby(0);
        assert!(validate_nuevo(&nuevo).is_err());
    }
}
