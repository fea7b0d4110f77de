// src/noyau/modules/vec.rs
//
// Vecteurs et tableaux : a ± b, ±b, dist, crochets [ ] (construction d’un tableau).

use crate::noyau::decimal::Contexte;
use crate::noyau::erreur::{ErreurArith, ResultatArith};
use crate::noyau::jetons::{
    Associativite::GaucheDroite, Jeton, PREC_ADDITIVE, PREC_IMPLICITE, PREC_PUISSANCE,
};
use crate::noyau::reglages::Reglages;
use crate::noyau::valeur::Valeur;

use super::avec_alias;
use super::base::racine;

fn est_negative(v: &Valeur) -> bool {
    match v {
        Valeur::Nombre(d) => d.est_negatif(),
        Valeur::Quantite(q) => q.valeur.est_negatif(),
        _ => false,
    }
}

/// a ± b → [a − b, a + b], la plus petite valeur en premier.
fn plus_ou_moins(a: Valeur, b: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    if matches!(a, Valeur::Vecteur(_)) || matches!(b, Valeur::Vecteur(_)) {
        return Err(ErreurArith::TypeInvalide("±", "un vecteur"));
    }
    let moins = a.clone().soustraire(b.clone(), ctx)?;
    let plus = a.additionner(b.clone(), ctx)?;
    if est_negative(&b) {
        Ok(Valeur::tableau(vec![plus, moins]))
    } else {
        Ok(Valeur::tableau(vec![moins, plus]))
    }
}

/// ±b → [−|b|, |b|]
fn positif_ou_negatif(b: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    if matches!(b, Valeur::Vecteur(_)) {
        return Err(ErreurArith::TypeInvalide("±", "un vecteur"));
    }
    let oppose = b.clone().negation(ctx)?;
    if est_negative(&b) {
        Ok(Valeur::tableau(vec![b, oppose]))
    } else {
        Ok(Valeur::tableau(vec![oppose, b]))
    }
}

/// Norme d’un vecteur, valeur absolue sinon.
fn distance(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    match v {
        Valeur::Vecteur(_) => racine(v.clone().multiplier(v, ctx)?, ctx),
        Valeur::Nombre(d) => Ok(Valeur::Nombre(d.abs())),
        Valeur::Quantite(q) => Ok(Valeur::Quantite(q.avec_valeur(q.valeur.abs()))),
        Valeur::NomInconnu(n) => Err(ErreurArith::NomInconnu(n)),
        autre => Err(ErreurArith::TypeInvalide("dist", autre.genre())),
    }
}

/// Contenu des crochets → tableau (une jonction donne ses éléments).
fn construire_tableau(v: Valeur, _ctx: Contexte) -> ResultatArith<Valeur> {
    match v {
        Valeur::Vecteur(e) => Ok(Valeur::Tableau(e)),
        autre => Ok(Valeur::tableau(vec![autre])),
    }
}

/// Crochets de tableau, partagés avec le module stats.
pub(crate) fn crochets() -> Vec<Jeton> {
    vec![
        Jeton::ouvrant("[", "]", Some(construire_tableau)).avec_aide("Début de tableau"),
        Jeton::fermant("]").avec_aide("Fin de tableau"),
    ]
}

pub fn jetons(_reglages: &Reglages) -> Vec<Jeton> {
    let mut v = avec_alias(
        Jeton::operateur("±", PREC_ADDITIVE, GaucheDroite, plus_ou_moins).avec_aide("Plus ou moins"),
        &["pm"],
    );
    v.extend(avec_alias(
        Jeton::fonction(" ±", PREC_PUISSANCE, positif_ou_negatif).avec_aide("Positif ou négatif"),
        &[" pm"],
    ));
    v.push(Jeton::fonction("dist", PREC_IMPLICITE, distance).avec_aide("Longueur d’un vecteur"));
    v.extend(crochets());
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::decimal::Decimal;

    const P: Contexte = Contexte { precision: 28 };

    fn n(x: i64) -> Valeur {
        Valeur::entier(x)
    }

    #[test]
    fn plus_ou_moins_ordonne() {
        assert_eq!(plus_ou_moins(n(5), n(2), P), Ok(Valeur::tableau(vec![n(3), n(7)])));
        assert_eq!(plus_ou_moins(n(5), n(-2), P), Ok(Valeur::tableau(vec![n(3), n(7)])));
        assert_eq!(positif_ou_negatif(n(2), P), Ok(Valeur::tableau(vec![n(-2), n(2)])));
        assert!(plus_ou_moins(Valeur::vecteur(vec![n(1)]), n(1), P).is_err());
    }

    #[test]
    fn norme() {
        let v = Valeur::vecteur(vec![n(3), n(4)]);
        assert_eq!(distance(v, P), Ok(n(5)));
        assert_eq!(distance(n(-2), P), Ok(n(2)));
        assert_eq!(
            distance(Valeur::Nombre("-0.5".parse::<Decimal>().unwrap()), P),
            Ok(Valeur::Nombre(Decimal::demi()))
        );
    }

    #[test]
    fn tableau_depuis_crochets() {
        let jonction = Valeur::vecteur(vec![n(1), n(2)]);
        assert_eq!(
            construire_tableau(jonction, P),
            Ok(Valeur::tableau(vec![n(1), n(2)]))
        );
        assert_eq!(construire_tableau(n(1), P), Ok(Valeur::tableau(vec![n(1)])));

        let ouvrant = &crochets()[0];
        assert!(ouvrant.enveloppe().is_some());
        assert_eq!(ouvrant.fermeture(), Some("]"));
    }
}
