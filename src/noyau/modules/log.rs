// src/noyau/modules/log.rs
//
// Logarithmes : log x (base 10), log (b, x), ln x.

use crate::noyau::analyse;
use crate::noyau::decimal::{Contexte, Decimal};
use crate::noyau::erreur::{ErreurArith, ResultatArith};
use crate::noyau::jetons::{Jeton, PREC_IMPLICITE};
use crate::noyau::reglages::Reglages;
use crate::noyau::valeur::Valeur;

fn log10(x: &Decimal, ctx: Contexte) -> ResultatArith<Decimal> {
    analyse::log_base(x, &Decimal::from(10), ctx)
}

fn logarithme(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    match &v {
        Valeur::Vecteur(e) if e.len() == 2 => match (&e[0], &e[1]) {
            (Valeur::Nombre(b), Valeur::Nombre(x)) => {
                Ok(Valeur::Nombre(analyse::log_base(x, b, ctx)?))
            }
            _ => Err(ErreurArith::Domaine("log (b, x) attend deux nombres".into())),
        },
        _ => v.appliquer_numerique("log", ctx, log10),
    }
}

fn logarithme_naturel(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    v.appliquer_numerique("ln", ctx, analyse::ln)
}

pub fn jetons(_reglages: &Reglages) -> Vec<Jeton> {
    vec![
        Jeton::fonction("log", PREC_IMPLICITE, logarithme)
            .avec_aide("Logarithme décimal, ou de base b : log (b, x)"),
        Jeton::fonction("ln", PREC_IMPLICITE, logarithme_naturel).avec_aide("Logarithme népérien"),
    ]
}
