// src/noyau/format.rs
//
// Affichage des valeurs
// - nombres : arrondis à (précision − 2) chiffres significatifs, puis écrits selon la notation
//   (mantisse * 10^k ; "10^k" seul si la mantisse vaut 1)
// - quantités : "valeur unités", vecteurs : (a, b), tableaux : [a, b], textes entre guillemets

use num_bigint::BigInt;

use super::decimal::Decimal;
use super::reglages::{Notation, Reglages, GUILLEMET};
use super::valeur::Valeur;

/// Décimales affichées au plus dans une mantisse.
pub const DECIMALES_MAX: u32 = 22;

/// Bornes (exclues) de l’écriture ingénieur en notation classique.
fn bornes_classiques() -> (Decimal, Decimal) {
    (Decimal::new(BigInt::from(5), -10), Decimal::new(BigInt::from(5), 12))
}

/// x / 10^k, exact.
fn decaler(x: &Decimal, k: i64) -> Decimal {
    Decimal::new(x.mantisse().clone(), x.exposant() - k)
}

fn exposant_affiche(x: &Decimal, notation: Notation) -> i64 {
    let e = x.ajuste();
    match notation {
        Notation::Normale => 0,
        Notation::Scientifique => e,
        Notation::Ingenieur => e.div_euclid(3) * 3,
        Notation::Classique => {
            let (bas, haut) = bornes_classiques();
            let a = x.abs();
            if a > bas && a < haut {
                e.div_euclid(3) * 3
            } else {
                e
            }
        }
    }
}

/// (mantisse arrondie, exposant) ; une retenue d’arrondi relance le calcul de l’exposant.
fn decomposer(x: &Decimal, notation: Notation) -> (Decimal, i64) {
    let k = exposant_affiche(x, notation);
    let m = decaler(x, k).quantifie(DECIMALES_MAX);

    let recompose = decaler(&m, -k);
    if notation != Notation::Normale && !m.est_zero() && exposant_affiche(&recompose, notation) != k {
        let k2 = exposant_affiche(&recompose, notation);
        return (decaler(&recompose, k2).quantifie(DECIMALES_MAX), k2);
    }
    (m, k)
}

pub fn formater_nombre(x: &Decimal, reglages: &Reglages) -> String {
    let chiffres = reglages.precision.saturating_sub(2).max(1);
    let x = x.arrondi_significatif(chiffres);
    if x.est_zero() {
        return "0".into();
    }

    let (m, k) = decomposer(&x, reglages.notation);
    let m = m.normalise();
    let texte = m.texte_plat().replace('.', &reglages.separateur_decimal().to_string());

    if k == 0 {
        return texte;
    }
    if m == Decimal::un() {
        return format!("10^{k}");
    }
    if m == Decimal::un().neg() {
        return format!("-10^{k}");
    }
    format!("{texte} * 10^{k}")
}

fn formater_liste(elements: &[Valeur], reglages: &Reglages, ouvrant: &str, fermant: &str) -> String {
    let separateur = format!("{} ", reglages.separateur_vecteur);
    let corps = elements
        .iter()
        .map(|e| formater(e, reglages))
        .collect::<Vec<_>>()
        .join(&separateur);
    format!("{ouvrant}{corps}{fermant}")
}

/// Texte affiché pour une valeur.
pub fn formater(v: &Valeur, reglages: &Reglages) -> String {
    match v {
        Valeur::Nombre(d) => formater_nombre(d, reglages),
        Valeur::Quantite(q) => format!("{} {}", formater_nombre(&q.valeur, reglages), q.unites),
        Valeur::Texte(t) => format!("{GUILLEMET}{t}{GUILLEMET}"),
        Valeur::Vecteur(e) => formater_liste(e, reglages, "(", ")"),
        Valeur::Tableau(e) => formater_liste(e, reglages, "[", "]"),
        Valeur::NomInconnu(n) => n.clone(),
    }
}
