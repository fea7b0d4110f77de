// src/noyau/modules/trig.rs
//
// Trigonométrie : un nombre est lu en radians, une quantité doit être un angle (rad).
// Les réciproques rendent un angle.

use crate::noyau::analyse;
use crate::noyau::decimal::{pi, Contexte, Decimal};
use crate::noyau::erreur::{ErreurArith, ResultatArith};
use crate::noyau::jetons::{Jeton, PREC_IMPLICITE};
use crate::noyau::quantite::{Quantite, RADIAN};
use crate::noyau::reglages::Reglages;
use crate::noyau::valeur::Valeur;

use super::{avec_alias, contexte_constantes};

type FnDecimale = fn(&Decimal, Contexte) -> ResultatArith<Decimal>;

/// Fonction directe : angle (ou nombre) → nombre.
fn directe(v: Valeur, ctx: Contexte, nom: &'static str, f: FnDecimale) -> ResultatArith<Valeur> {
    match v {
        Valeur::Nombre(x) => Ok(Valeur::Nombre(f(&x, ctx)?)),
        Valeur::Quantite(q) if q.unites.est_angle() => Ok(Valeur::Nombre(f(&q.valeur, ctx)?)),
        Valeur::Quantite(_) => Err(ErreurArith::TrigoNonAngle),
        Valeur::Tableau(t) => {
            let elements = t
                .iter()
                .map(|e| directe(e.clone(), ctx, nom, f))
                .collect::<ResultatArith<Vec<_>>>()?;
            Ok(Valeur::tableau(elements))
        }
        Valeur::NomInconnu(n) => Err(ErreurArith::NomInconnu(n)),
        autre => Err(ErreurArith::TypeInvalide(nom, autre.genre())),
    }
}

/// Réciproque : nombre → angle.
fn reciproque(v: Valeur, ctx: Contexte, nom: &'static str, f: FnDecimale) -> ResultatArith<Valeur> {
    match v {
        Valeur::Nombre(x) => Ok(Valeur::Quantite(Quantite::angle(f(&x, ctx)?))),
        Valeur::Tableau(t) => {
            let elements = t
                .iter()
                .map(|e| reciproque(e.clone(), ctx, nom, f))
                .collect::<ResultatArith<Vec<_>>>()?;
            Ok(Valeur::tableau(elements))
        }
        Valeur::NomInconnu(n) => Err(ErreurArith::NomInconnu(n)),
        autre => Err(ErreurArith::TypeInvalide(nom, autre.genre())),
    }
}

fn sinus(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    directe(v, ctx, "sin", analyse::sin)
}

fn cosinus(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    directe(v, ctx, "cos", analyse::cos)
}

fn tangente(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    directe(v, ctx, "tan", analyse::tan)
}

fn arcsinus(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    reciproque(v, ctx, "arcsin", analyse::asin)
}

fn arccosinus(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    reciproque(v, ctx, "arccos", analyse::acos)
}

fn arctangente(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    reciproque(v, ctx, "arctan", analyse::atan)
}

// f^n x : (exposant, argument) → f(argument)^exposant
fn sinus_puissance(n: Valeur, x: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    sinus(x, ctx)?.puissance(n, ctx)
}

fn cosinus_puissance(n: Valeur, x: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    cosinus(x, ctx)?.puissance(n, ctx)
}

fn tangente_puissance(n: Valeur, x: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    tangente(x, ctx)?.puissance(n, ctx)
}

pub fn jetons(_reglages: &Reglages) -> Vec<Jeton> {
    let ctx = contexte_constantes();
    let mut v = vec![
        Jeton::fonction("sin", PREC_IMPLICITE, sinus).avec_aide("Sinus"),
        Jeton::fonction("cos", PREC_IMPLICITE, cosinus).avec_aide("Cosinus"),
        Jeton::fonction("arcsin", PREC_IMPLICITE, arcsinus).avec_aide("Angle de sinus donné"),
        Jeton::fonction("arccos", PREC_IMPLICITE, arccosinus).avec_aide("Angle de cosinus donné"),
        Jeton::double("sin ^", sinus_puissance).avec_aide("Puissance du sinus"),
        Jeton::double("cos ^", cosinus_puissance).avec_aide("Puissance du cosinus"),
        Jeton::variable(RADIAN, Valeur::Quantite(Quantite::unite(RADIAN))).avec_aide("Radian"),
    ];

    v.extend(avec_alias(
        Jeton::fonction("tan", PREC_IMPLICITE, tangente).avec_aide("Tangente"),
        &["tg"],
    ));
    v.extend(avec_alias(
        Jeton::fonction("arctan", PREC_IMPLICITE, arctangente).avec_aide("Angle de tangente donnée"),
        &["arctg"],
    ));
    v.extend(avec_alias(
        Jeton::double("tan ^", tangente_puissance).avec_aide("Puissance de la tangente"),
        &["tg ^"],
    ));

    match pi(ctx).div(&Decimal::from(180), ctx) {
        Ok(degre) => v.extend(avec_alias(
            Jeton::variable("deg", Valeur::Quantite(Quantite::angle(degre))).avec_aide("Degré"),
            &["°"],
        )),
        Err(err) => tracing::warn!(erreur = %err, "unité deg indisponible"),
    }

    v
}
