// src/noyau/modules/comb.rs
//
// Combinatoire et arithmétique : n!, perm (n, k), comb (n, k), mod, pf (facteurs premiers).

use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};

use crate::noyau::analyse::{self, LIMITE_FACTORIELLE};
use crate::noyau::decimal::{Contexte, Decimal};
use crate::noyau::erreur::{ErreurArith, ResultatArith};
use crate::noyau::jetons::{
    Associativite::GaucheDroite, Jeton, PREC_IMPLICITE, PREC_MULTIPLICATIVE, PREC_PUISSANCE,
};
use crate::noyau::reglages::Reglages;
use crate::noyau::valeur::Valeur;

/// Plus grand diviseur d’essai de la factorisation.
const LIMITE_DIVISEUR: u64 = 10_000_000;

fn factorielle(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    v.appliquer_numerique("factorielle", ctx, analyse::factorielle)
}

fn entier(v: &Valeur, nom: &'static str) -> ResultatArith<BigInt> {
    match v {
        Valeur::Nombre(d) => d
            .vers_bigint()
            .ok_or_else(|| ErreurArith::Domaine(format!("{nom} : {d} n’est pas entier"))),
        Valeur::NomInconnu(n) => Err(ErreurArith::NomInconnu(n.clone())),
        autre => Err(ErreurArith::TypeInvalide(nom, autre.genre())),
    }
}

/// (n, k) entiers, k dans [0, LIMITE_FACTORIELLE]
fn arguments(v: &Valeur, nom: &'static str) -> ResultatArith<(BigInt, u64)> {
    let paire = match v {
        Valeur::Vecteur(e) if e.len() == 2 => e,
        _ => {
            return Err(ErreurArith::Domaine(format!(
                "{nom} attend deux arguments : {nom} (n, k)"
            )))
        }
    };
    let n = entier(&paire[0], nom)?;
    let k = entier(&paire[1], nom)?;
    let k = k
        .to_u64()
        .filter(|k| *k <= LIMITE_FACTORIELLE as u64)
        .ok_or_else(|| ErreurArith::Domaine(format!("{nom} : k = {k} hors limites")))?;
    Ok((n, k))
}

/// n·(n−1)·…·(n−k+1)
fn produit_descendant(n: &BigInt, k: u64) -> BigInt {
    let mut acc = BigInt::one();
    let mut facteur = n.clone();
    for _ in 0..k {
        acc *= &facteur;
        facteur -= 1u32;
    }
    acc
}

fn permutations(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    let (n, k) = arguments(&v, "perm")?;
    Ok(Valeur::Nombre(Decimal::from(produit_descendant(&n, k)).arrondi(ctx)))
}

fn combinaisons(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    let (n, k) = arguments(&v, "comb")?;
    let k_fact = produit_descendant(&BigInt::from(k), k);
    let c = produit_descendant(&n, k) / k_fact;
    Ok(Valeur::Nombre(Decimal::from(c).arrondi(ctx)))
}

/// "2^3 * 5 * 7^2"
fn facteurs_premiers(v: Valeur, _ctx: Contexte) -> ResultatArith<Valeur> {
    let n = entier(&v, "pf")?;
    if n < BigInt::one() {
        return Err(ErreurArith::Domaine(format!("pf de {n} (entier positif attendu)")));
    }

    let mut reste = n;
    let mut facteurs: Vec<(BigInt, u32)> = Vec::new();
    let mut d: u64 = 2;

    while reste > BigInt::one() {
        let bd = BigInt::from(d);
        if &bd * &bd > reste {
            facteurs.push((reste.clone(), 1));
            break;
        }
        if d > LIMITE_DIVISEUR {
            return Err(ErreurArith::Depassement("facteurs premiers"));
        }

        let mut puissance = 0u32;
        while (&reste % &bd).is_zero() {
            reste /= &bd;
            puissance += 1;
        }
        if puissance > 0 {
            facteurs.push((bd, puissance));
        }
        d += if d == 2 { 1 } else { 2 };
    }

    if facteurs.is_empty() {
        return Ok(Valeur::Texte("1".into()));
    }

    let texte = facteurs
        .iter()
        .map(|(p, e)| if *e == 1 { p.to_string() } else { format!("{p}^{e}") })
        .collect::<Vec<_>>()
        .join(" * ");
    Ok(Valeur::Texte(texte))
}

pub fn jetons(_reglages: &Reglages) -> Vec<Jeton> {
    vec![
        Jeton::signe("!", PREC_PUISSANCE, factorielle).avec_aide("Factorielle"),
        Jeton::fonction("perm", PREC_IMPLICITE, permutations)
            .avec_aide("Nombre d’arrangements : perm (n, k)"),
        Jeton::fonction("comb", PREC_IMPLICITE, combinaisons)
            .avec_aide("Nombre de combinaisons : comb (n, k)"),
        Jeton::operateur("mod", PREC_MULTIPLICATIVE, GaucheDroite, Valeur::modulo)
            .avec_aide("Reste de la division"),
        Jeton::fonction("pf", PREC_IMPLICITE, facteurs_premiers)
            .avec_aide("Décomposition en facteurs premiers"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Contexte = Contexte { precision: 28 };

    fn paire(n: i64, k: i64) -> Valeur {
        Valeur::vecteur(vec![Valeur::entier(n), Valeur::entier(k)])
    }

    #[test]
    fn arrangements_et_combinaisons() {
        assert_eq!(permutations(paire(5, 2), P), Ok(Valeur::entier(20)));
        assert_eq!(combinaisons(paire(5, 2), P), Ok(Valeur::entier(10)));
        assert_eq!(combinaisons(paire(10, 0), P), Ok(Valeur::entier(1)));
        assert_eq!(permutations(paire(3, 5), P), Ok(Valeur::entier(0)));
        assert!(permutations(Valeur::entier(5), P).is_err());
    }

    #[test]
    fn factorisation() {
        let pf = |n| facteurs_premiers(Valeur::entier(n), P);
        assert_eq!(pf(360), Ok(Valeur::Texte("2^3 * 3^2 * 5".into())));
        assert_eq!(pf(97), Ok(Valeur::Texte("97".into())));
        assert_eq!(pf(1), Ok(Valeur::Texte("1".into())));
        assert!(pf(0).is_err());
    }

    #[test]
    fn factorielle_sur_tableau() {
        let t = Valeur::tableau(vec![Valeur::entier(3), Valeur::entier(4)]);
        assert_eq!(
            factorielle(t, P),
            Ok(Valeur::tableau(vec![Valeur::entier(6), Valeur::entier(24)]))
        );
    }
}
