//! Approximate coordinates of each Brazilian state capital.

use crate::models::Coordinates;

/// A state code with its capital city and position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateCapital {
    pub state_code: &'static str,
    pub city: &'static str,
    pub coordinates: Coordinates,
}

const fn capital(state_code: &'static str, city: &'static str, lat: f64, lng: f64) -> StateCapital {
    StateCapital {
        state_code,
        city,
        coordinates: Coordinates::new(lat, lng),
    }
}

/// The 26 states plus the Federal District.
pub const STATE_CAPITALS: [StateCapital; 27] = [
    capital("AC", "Rio Branco", -9.9754, -67.8249),
    capital("AL", "Maceió", -9.6658, -35.7353),
    capital("AP", "Macapá", 0.0349, -51.0694),
    capital("AM", "Manaus", -3.1190, -60.0217),
    capital("BA", "Salvador", -12.9714, -38.5014),
    capital("CE", "Fortaleza", -3.7319, -38.5267),
    capital("DF", "Brasília", -15.7939, -47.8828),
    capital("ES", "Vitória", -20.3155, -40.3128),
    capital("GO", "Goiânia", -16.6869, -49.2648),
    capital("MA", "São Luís", -2.5307, -44.3068),
    capital("MT", "Cuiabá", -15.6014, -56.0979),
    capital("MS", "Campo Grande", -20.4697, -54.6201),
    capital("MG", "Belo Horizonte", -19.9167, -43.9345),
    capital("PA", "Belém", -1.4558, -48.4902),
    capital("PB", "João Pessoa", -7.1195, -34.8450),
    capital("PR", "Curitiba", -25.4284, -49.2733),
    capital("PE", "Recife", -8.0476, -34.8770),
    capital("PI", "Teresina", -5.0920, -42.8038),
    capital("RJ", "Rio de Janeiro", -22.9068, -43.1729),
    capital("RN", "Natal", -5.7945, -35.2110),
    capital("RS", "Porto Alegre", -30.0346, -51.2177),
    capital("RO", "Porto Velho", -8.7612, -63.9004),
    capital("RR", "Boa Vista", 2.8235, -60.6758),
    capital("SC", "Florianópolis", -27.5954, -48.5480),
    capital("SP", "São Paulo", -23.5505, -46.6333),
    capital("SE", "Aracaju", -10.9472, -37.0731),
    capital("TO", "Palmas", -10.1840, -48.3336),
];

/// Look up a state's capital by two-letter code, ignoring case and surrounding whitespace.
pub fn state_capital(state_code: &str) -> Option<&'static StateCapital> {
    let code = state_code.trim();
    STATE_CAPITALS
        .iter()
        .find(|c| c.state_code.eq_ignore_ascii_case(code))
}

/// Shortcut for [`state_capital`] when only the position matters.
pub fn capital_coordinates(state_code: &str) -> Option<Coordinates> {
    state_capital(state_code).map(|c| c.coordinates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = STATE_CAPITALS.iter().map(|c| c.state_code).collect();
        assert_eq!(codes.len(), STATE_CAPITALS.len());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let sp = state_capital("sp").unwrap();
        assert_eq!(sp.city, "São Paulo");
        assert_eq!(capital_coordinates(" RJ "), Some(Coordinates::new(-22.9068, -43.1729)));
    }

    #[test]
    fn test_unknown_state() {
        assert!(capital_coordinates("XX").is_none());
        assert!(capital_coordinates("").is_none());
    }

    #[test]
    fn test_positions_are_inside_brazil() {
        for c in &STATE_CAPITALS {
            assert!((-34.0..=5.5).contains(&c.coordinates.lat), "{}", c.city);
            assert!((-74.0..=-34.0).contains(&c.coordinates.lng), "{}", c.city);
        }
    }
}
