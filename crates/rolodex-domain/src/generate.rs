use crate::contact::Contact;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GIVEN_NAMES: &[&str] = &[
    "Ada", "Alan", "Alice", "Amir", "Anna", "Ben", "Carla", "Chen", "Clara", "Dan", "Dmitri",
    "Elena", "Emil", "Erik", "Fatima", "Felix", "Grace", "Hannah", "Hugo", "Ines", "Ivan", "Jack",
    "Jana", "John", "Karl", "Kira", "Lena", "Leo", "Lucia", "Marco", "Maria", "Mateo", "Mia",
    "Nadia", "Noah", "Olga", "Omar", "Paula", "Pedro", "Priya", "Rosa", "Samir", "Sofia", "Tara",
    "Tomas", "Vera", "Wei", "Yara", "Yusuf", "Zoe",
];

const SURNAMES: &[&str] = &[
    "Abbott", "Ahmed", "Andersen", "Baker", "Becker", "Bell", "Castro", "Chen", "Clark", "Costa",
    "Diaz", "Dubois", "Evans", "Fischer", "Fleming", "Garcia", "Gruber", "Haas", "Hansen",
    "Ivanov", "Jansen", "Johnson", "Kaur", "Keller", "Kim", "Kovacs", "Larsen", "Lee", "Lopez",
    "Martin", "Meyer", "Moreau", "Nakamura", "Nielsen", "Novak", "Okafor", "Olsen", "Patel",
    "Petrov", "Quinn", "Ricci", "Rossi", "Sato", "Schmidt", "Silva", "Smith", "Tanaka", "Vargas",
    "Weber", "Zhang",
];

/// Deterministic random contact generator.
///
/// The same seed always yields the same contact sequence, which keeps seeded
/// CLI runs and tests reproducible.
pub struct ContactGenerator {
    rng: StdRng,
}

impl ContactGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_contact(&mut self) -> Contact {
        let given = GIVEN_NAMES[self.rng.gen_range(0..GIVEN_NAMES.len())];
        let surname = SURNAMES[self.rng.gen_range(0..SURNAMES.len())];
        let phone = format!(
            "({:03}) {:03}-{:04}",
            self.rng.gen_range(200..1000),
            self.rng.gen_range(200..1000),
            self.rng.gen_range(0..10000)
        );
        Contact::new(given.to_string(), surname.to_string(), phone)
    }

    pub fn take(&mut self, n: usize) -> Vec<Contact> {
        (0..n).map(|_| self.next_contact()).collect()
    }
}
