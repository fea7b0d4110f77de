// src/noyau/modules/base.rs
//
// Jetons essentiels : parenthèses, opérateurs arithmétiques, jonction, racine, π, e.

use crate::noyau::analyse;
use crate::noyau::decimal::{pi, Contexte, Decimal};
use crate::noyau::erreur::ResultatArith;
use crate::noyau::jetons::{
    Associativite::{DroiteGauche, GaucheDroite},
    Jeton, NOM_IMPLICITE, PREC_ADDITIVE, PREC_IMPLICITE, PREC_JONCTION, PREC_MULTIPLICATIVE,
    PREC_PUISSANCE,
};
use crate::noyau::reglages::Reglages;
use crate::noyau::valeur::Valeur;

use super::{avec_alias, contexte_constantes};

/// √x ≡ x^0.5 (unités comprises)
pub(crate) fn racine(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    v.puissance(Valeur::Nombre(Decimal::demi()), ctx)
}

pub fn jetons(reglages: &Reglages) -> Vec<Jeton> {
    let ctx = contexte_constantes();

    let mut v = vec![
        Jeton::parenthese_ouvrante().avec_aide("Parenthèse ouvrante"),
        Jeton::parenthese_fermante().avec_aide("Parenthèse fermante"),
        Jeton::operateur("+", PREC_ADDITIVE, GaucheDroite, Valeur::additionner)
            .avec_aide("Addition"),
        Jeton::operateur("-", PREC_ADDITIVE, GaucheDroite, Valeur::soustraire)
            .avec_aide("Soustraction"),
        Jeton::operateur("*", PREC_MULTIPLICATIVE, GaucheDroite, Valeur::multiplier)
            .avec_aide("Multiplication"),
        Jeton::operateur(":", PREC_MULTIPLICATIVE, GaucheDroite, Valeur::diviser)
            .avec_aide("Division en ligne"),
        Jeton::operateur("/", PREC_JONCTION, GaucheDroite, Valeur::diviser)
            .avec_aide("Barre de fraction (priorité la plus basse)"),
        Jeton::operateur("^", PREC_PUISSANCE, DroiteGauche, Valeur::puissance)
            .avec_aide("Puissance"),
        Jeton::fonction(" -", PREC_PUISSANCE, Valeur::negation).avec_aide("Opposé"),
        Jeton::operateur(NOM_IMPLICITE, PREC_IMPLICITE, DroiteGauche, Valeur::multiplier)
            .avec_aide("Multiplication implicite"),
        Jeton::operateur(
            &reglages.separateur_vecteur,
            PREC_JONCTION,
            GaucheDroite,
            Valeur::joindre,
        )
        .avec_aide("Séparateur d’arguments (construit un vecteur)"),
    ];

    v.extend(avec_alias(
        Jeton::fonction("sqrt", PREC_PUISSANCE, racine).avec_aide("Racine carrée"),
        &["√"],
    ));
    v.extend(avec_alias(
        Jeton::variable("pi", Valeur::Nombre(pi(ctx))).avec_aide("Nombre π"),
        &["π"],
    ));

    match analyse::exp(&Decimal::un(), ctx) {
        Ok(e) => v.push(Jeton::variable("e", Valeur::Nombre(e)).avec_aide("Nombre d’Euler")),
        Err(err) => tracing::warn!(erreur = %err, "constante e indisponible"),
    }

    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn racine_des_unites() {
        use crate::noyau::quantite::{Quantite, Unites};

        let ctx = Contexte::nouveau(28);
        let m2 = Valeur::Quantite(Quantite::new(Decimal::from(4), Unites::nouvelles([("m", 2)])));
        let r = racine(m2, ctx).unwrap();
        assert_eq!(r, Valeur::Quantite(Quantite::new(Decimal::from(2), Unites::une("m"))));
        assert!(racine(Valeur::entier(-4), ctx).is_err());
    }

    #[test]
    fn separateur_vecteur_configurable() {
        let r = Reglages {
            separateur_vecteur: ";".into(),
            ..Reglages::default()
        };
        assert!(jetons(&r).iter().any(|j| j.nom() == ";"));
    }
}
