//! Display-name generation for new projects.
//!
//! Names are cosmetic (identity lives in the uuid), so the generator is a
//! trait seam: production uses the built-in word-pair generator, tests can
//! inject a fixed name.

use uuid::Uuid;

/// Produces human-readable display names for freshly created projects.
pub trait NameGenerator {
    fn generate(&self) -> String;
}

const ADJECTIVES: &[&str] = &[
    "rojo", "azul", "verde", "dorado", "plateado", "brillante", "alegre", "tranquilo", "valiente",
    "curioso", "amable", "fuerte", "rapido", "sereno", "claro", "oscuro",
];

const NOUNS: &[&str] = &[
    "rio", "montana", "estrella", "luna", "sol", "bosque", "mar", "viento", "fuego", "nube",
    "piedra", "flor", "camino", "puente", "faro", "jardin",
];

/// Default generator: `adjective-noun` drawn from small embedded Spanish word
/// lists, seeded from uuid randomness.
pub struct WordPairGenerator;

impl NameGenerator for WordPairGenerator {
    fn generate(&self) -> String {
        let seed = Uuid::new_v4();
        let bytes = seed.as_bytes();
        let adjective = ADJECTIVES[bytes[0] as usize % ADJECTIVES.len()];
        let noun = NOUNS[bytes[1] as usize % NOUNS.len()];
        format!("{adjective}-{noun}")
    }
}
