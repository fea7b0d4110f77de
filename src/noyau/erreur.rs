// src/noyau/erreur.rs
//
// Taxonomie des erreurs du noyau
// ------------------------------
// - ErreurArith   : levée par une opération sur des valeurs (au moment où la valeur sert)
// - ErreurCalcul  : découpage, compilation (jetons / RPN / pile) + arithmétique
//
// Aucune erreur ne sort de Calculatrice::calculer : elle est stockée comme état de session.

use thiserror::Error;

/// Erreurs arithmétiques / de domaine (opérations sur les valeurs).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurArith {
    #[error("{0} d’unités différentes")]
    UnitesDifferentes(&'static str),

    #[error("trigonométrie d’une quantité qui n’est pas un angle")]
    TrigoNonAngle,

    #[error("division par zéro")]
    DivisionParZero,

    #[error("puissance d’exposant quantité")]
    PuissanceQuantite,

    #[error("{0} de tailles différentes")]
    TaillesDifferentes(&'static str),

    #[error("nom inconnu : '{0}'")]
    NomInconnu(String),

    #[error("{operation} impossible entre {gauche} et {droite}")]
    TypesIncompatibles {
        operation: &'static str,
        gauche: &'static str,
        droite: &'static str,
    },

    #[error("{0} impossible sur {1}")]
    TypeInvalide(&'static str, &'static str),

    #[error("hors domaine : {0}")]
    Domaine(String),

    #[error("dépassement : {0}")]
    Depassement(&'static str),
}

/// Catégorie d’une erreur de calcul (utile aux appelants et aux tests).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Categorie {
    Lexicale,
    Compilation,
    Arithmetique,
}

/// Erreurs d’une instruction complète (découpage → évaluation).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurCalcul {
    // --- lexicales ---
    #[error("guillemets non fermés")]
    GuillemetsNonFermes,

    #[error("parenthèse non ouverte : '{0}'")]
    CrochetNonOuvert(String),

    #[error("parenthèse non fermée : '{0}'")]
    CrochetNonFerme(String),

    // --- compilation ---
    #[error("nom inconnu : '{0}'")]
    NomInconnu(String),

    #[error("erreur d’affectation : '{0}'")]
    Affectation(String),

    #[error("erreur d’affectation composée : '{0}'")]
    AffectationComposee(String),

    #[error("pas assez d’opérandes pour '{0}'")]
    OperandesManquantes(String),

    #[error("erreur de compilation : {0} valeur(s) en fin de calcul")]
    PileIncorrecte(usize),

    #[error("nombre invalide : '{0}'")]
    NombreInvalide(String),

    #[error("commande inconnue : '{0}'")]
    CommandeInconnue(String),

    // --- arithmétique ---
    #[error(transparent)]
    Arithmetique(#[from] ErreurArith),
}

impl ErreurCalcul {
    pub fn categorie(&self) -> Categorie {
        use ErreurCalcul::*;

        match self {
            GuillemetsNonFermes | CrochetNonOuvert(_) | CrochetNonFerme(_) => Categorie::Lexicale,
            NomInconnu(_)
            | Affectation(_)
            | AffectationComposee(_)
            | OperandesManquantes(_)
            | PileIncorrecte(_)
            | NombreInvalide(_)
            | CommandeInconnue(_) => Categorie::Compilation,
            Arithmetique(_) => Categorie::Arithmetique,
        }
    }
}

pub type ResultatArith<T> = Result<T, ErreurArith>;
pub type ResultatCalcul<T> = Result<T, ErreurCalcul>;
