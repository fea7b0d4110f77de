// src/noyau/modules/si.rs
//
// Unités SI et préfixes décimaux. Chaque unité est une variable du registre
// dont la valeur est une quantité exprimée en unités de base (kg, m, s, A, K, mol, rad).

use num_bigint::BigInt;

use crate::noyau::decimal::Decimal;
use crate::noyau::jetons::Jeton;
use crate::noyau::quantite::{Quantite, Unites, RADIAN};
use crate::noyau::reglages::Reglages;
use crate::noyau::valeur::Valeur;

use super::contexte_constantes;

/// Exposant décimal → préfixe
const PREFIXES: &[(i64, &str)] = &[
    (-9, "n"),
    (-6, "mc"),
    (-3, "m"),
    (-2, "c"),
    (-1, "d"),
    (0, ""),
    (1, "da"),
    (2, "h"),
    (3, "k"),
    (6, "M"),
    (9, "G"),
];

/// Autre écriture de micro.
const MICRO: &str = "μ";

const TOUS: &[i64] = &[-9, -6, -3, 0, 3, 6, 9];
const SEUL: &[i64] = &[0];

fn prefixe(exposant: i64) -> &'static str {
    PREFIXES
        .iter()
        .find(|(e, _)| *e == exposant)
        .map_or("", |(_, p)| p)
}

/// Unité dérivée : kg^a · m^b · s^c · A^d
fn derivee(kg: i64, m: i64, s: i64, a: i64) -> Quantite {
    Quantite::new(
        Decimal::un(),
        Unites::nouvelles([("kg", kg), ("m", m), ("s", s), ("A", a)]),
    )
}

fn multiple(valeur: &str, unites: &[(&str, i64)]) -> Quantite {
    let valeur = valeur.parse().unwrap_or_else(|_| Decimal::un());
    Quantite::new(valeur, Unites::nouvelles(unites.iter().copied()))
}

/// Ajoute `nom` et ses variantes préfixées (μ en plus de mc).
fn declarer(v: &mut Vec<Jeton>, unite: Quantite, nom: &str, exposants: &[i64]) {
    let ctx = contexte_constantes();
    for &exposant in exposants {
        let facteur = Decimal::new(BigInt::from(1), exposant);
        let valeur = match unite.valeur.mul(&facteur, ctx) {
            Ok(d) => Valeur::Quantite(unite.avec_valeur(d)),
            Err(err) => {
                tracing::warn!(unite = nom, exposant, erreur = %err, "préfixe ignoré");
                continue;
            }
        };

        let jeton = Jeton::variable(&format!("{}{nom}", prefixe(exposant)), valeur)
            .avec_aide("Unité SI");
        if exposant == -6 {
            v.push(jeton.renomme(&format!("{MICRO}{nom}")));
        }
        v.push(jeton);
    }
}

pub fn jetons(_reglages: &Reglages) -> Vec<Jeton> {
    let mut v = Vec::new();

    declarer(&mut v, multiple("0.001", &[("kg", 1)]), "g", &[-9, -6, -3, 0, 3]);
    declarer(&mut v, multiple("1000", &[("kg", 1)]), "t", &[0, 3, 6, 9]);
    declarer(&mut v, Quantite::unite("m"), "m", &[-9, -6, -3, -2, -1, 0, 3]);
    declarer(&mut v, Quantite::unite("s"), "s", &[-9, -6, -3, 0]);
    declarer(&mut v, Quantite::unite("A"), "A", TOUS);
    declarer(&mut v, Quantite::unite("K"), "K", TOUS);
    declarer(&mut v, Quantite::unite("mol"), "mol", TOUS);
    declarer(&mut v, Quantite::unite(RADIAN), RADIAN, SEUL);

    declarer(&mut v, derivee(0, 0, -1, 0), "Hz", TOUS);
    declarer(&mut v, derivee(1, 1, -2, 0), "N", TOUS);
    declarer(&mut v, derivee(1, -1, -2, 0), "Pa", &[-9, -6, -3, 0, 2, 3, 6, 9]);
    declarer(&mut v, derivee(1, 2, -2, 0), "J", TOUS);
    declarer(&mut v, derivee(1, 2, -3, 0), "W", TOUS);
    declarer(&mut v, derivee(0, 0, 1, 1), "C", TOUS);
    declarer(&mut v, derivee(1, 2, -3, -1), "V", TOUS);
    declarer(&mut v, derivee(1, 2, -3, -2), "ohm", TOUS);
    declarer(&mut v, derivee(1, 2, -3, -2), "Ω", TOUS);
    declarer(&mut v, derivee(0, 0, -1, 0), "Bq", &[0, 3, 6, 9]);
    declarer(&mut v, derivee(0, 2, -2, 0), "Gy", &[-6, -3, -2, 0]);

    declarer(&mut v, multiple("0.001", &[("m", 3)]), "l", &[-3, 0]);
    declarer(&mut v, multiple("10000", &[("m", 2)]), "ha", SEUL);

    declarer(&mut v, multiple("60", &[("s", 1)]), "min", SEUL);
    declarer(&mut v, multiple("3600", &[("s", 1)]), "h", SEUL);
    declarer(&mut v, multiple("86400", &[("s", 1)]), "day", SEUL);
    declarer(&mut v, multiple("31557600", &[("s", 1)]), "year", SEUL);

    v
}
