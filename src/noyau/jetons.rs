// src/noyau/jetons.rs
//
// Jetons : modèle commun aux opérateurs, fonctions, crochets et valeurs
// ---------------------------------------------------------------------
// - le GENRE fixe l’arité (jamais stockée à part) : pas d’incohérence possible
// - les constructeurs garantissent la cohérence genre / opération
// - `tokenize` transforme les mots découpés en jetons (registre, environnement, littéraux)

use super::decimal::{Contexte, Decimal};
use super::environnement::Environnement;
use super::erreur::{ErreurArith, ErreurCalcul, ResultatArith, ResultatCalcul};
use super::registre::Registre;
use super::reglages::Reglages;
use super::valeur::Valeur;

/* ------------------------ Précédences ------------------------ */

pub const PREC_JONCTION: u8 = 0;
pub const PREC_ADDITIVE: u8 = 1;
pub const PREC_MULTIPLICATIVE: u8 = 2;
/// Multiplication implicite, fonctions nommées (sin, log, …)
pub const PREC_IMPLICITE: u8 = 3;
/// ^, moins unaire, racine, factorielle
pub const PREC_PUISSANCE: u8 = 4;
pub const PREC_LITTERAL: u8 = 10;

/// Nom réservé de la multiplication implicite.
pub const NOM_IMPLICITE: &str = "_dot_";

pub type FnUnaire = fn(Valeur, Contexte) -> ResultatArith<Valeur>;
pub type FnBinaire = fn(Valeur, Valeur, Contexte) -> ResultatArith<Valeur>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Genre {
    ParOuvrante,
    ParFermante,
    /// Crochet ouvrant personnalisé (ex. '[' construit un tableau)
    Ouvrant,
    Fermant,
    Operateur,
    /// Fonction suivie d’une puissance : "sin ^" (sin^2 x)
    Double,
    Fonction,
    /// Opérateur postfixe (factorielle)
    Signe,
    Nombre,
    Texte,
    Variable,
}

impl Genre {
    pub fn arite(self) -> usize {
        match self {
            Genre::Fonction | Genre::Signe => 1,
            Genre::Operateur | Genre::Double => 2,
            _ => 0,
        }
    }

    pub fn est_ouvrant(self) -> bool {
        matches!(self, Genre::ParOuvrante | Genre::Ouvrant)
    }

    pub fn est_fermant(self) -> bool {
        matches!(self, Genre::ParFermante | Genre::Fermant)
    }

    pub fn est_crochet(self) -> bool {
        self.est_ouvrant() || self.est_fermant()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativite {
    GaucheDroite,
    DroiteGauche,
}

#[derive(Clone, Debug)]
pub enum Operation {
    Aucune,
    /// Valeur produite (copie fraîche à chaque évaluation)
    Constante(Valeur),
    Unaire(FnUnaire),
    Binaire(FnBinaire),
}

/// Résultat d’un jeton appliqué : une valeur, ou plusieurs à empiler.
#[derive(Clone, Debug, PartialEq)]
pub enum Sortie {
    Une(Valeur),
    Plusieurs(Vec<Valeur>),
}

#[derive(Clone, Debug)]
pub struct Jeton {
    nom: String,
    genre: Genre,
    operation: Operation,
    precedence: u8,
    associativite: Associativite,
    fermeture: Option<String>,
    aide: &'static str,
}

impl Jeton {
    fn brut(nom: &str, genre: Genre, operation: Operation, precedence: u8) -> Self {
        Self {
            nom: nom.to_string(),
            genre,
            operation,
            precedence,
            associativite: Associativite::GaucheDroite,
            fermeture: None,
            aide: "",
        }
    }

    /* ---- crochets ---- */

    pub fn parenthese_ouvrante() -> Self {
        let mut j = Self::brut("(", Genre::ParOuvrante, Operation::Aucune, PREC_JONCTION);
        j.fermeture = Some(")".into());
        j
    }

    pub fn parenthese_fermante() -> Self {
        Self::brut(")", Genre::ParFermante, Operation::Aucune, PREC_JONCTION)
    }

    /// Crochet ouvrant ; `constructeur` reçoit le contenu (valeur unique ou jonction).
    pub fn ouvrant(nom: &str, fermeture: &str, constructeur: Option<FnUnaire>) -> Self {
        let operation = constructeur.map_or(Operation::Aucune, Operation::Unaire);
        let mut j = Self::brut(nom, Genre::Ouvrant, operation, PREC_JONCTION);
        j.fermeture = Some(fermeture.into());
        j
    }

    pub fn fermant(nom: &str) -> Self {
        Self::brut(nom, Genre::Fermant, Operation::Aucune, PREC_JONCTION)
    }

    /* ---- opérateurs et fonctions ---- */

    pub fn operateur(nom: &str, precedence: u8, associativite: Associativite, f: FnBinaire) -> Self {
        let mut j = Self::brut(nom, Genre::Operateur, Operation::Binaire(f), precedence);
        j.associativite = associativite;
        j
    }

    /// "fonction ^" : f^n x  ≡  f(x)^n
    pub fn double(nom: &str, f: FnBinaire) -> Self {
        let mut j = Self::brut(nom, Genre::Double, Operation::Binaire(f), PREC_IMPLICITE);
        j.associativite = Associativite::DroiteGauche;
        j
    }

    pub fn fonction(nom: &str, precedence: u8, f: FnUnaire) -> Self {
        let mut j = Self::brut(nom, Genre::Fonction, Operation::Unaire(f), precedence);
        j.associativite = Associativite::DroiteGauche;
        j
    }

    pub fn signe(nom: &str, precedence: u8, f: FnUnaire) -> Self {
        Self::brut(nom, Genre::Signe, Operation::Unaire(f), precedence)
    }

    /* ---- valeurs ---- */

    pub fn nombre(source: &str, valeur: Decimal) -> Self {
        Self::brut(
            source,
            Genre::Nombre,
            Operation::Constante(Valeur::Nombre(valeur)),
            PREC_LITTERAL,
        )
    }

    pub fn texte(source: &str, texte: &str) -> Self {
        Self::brut(
            source,
            Genre::Texte,
            Operation::Constante(Valeur::Texte(texte.to_string())),
            PREC_LITTERAL,
        )
    }

    pub fn variable(nom: &str, valeur: Valeur) -> Self {
        Self::brut(nom, Genre::Variable, Operation::Constante(valeur), PREC_LITTERAL)
    }

    /* ---- dérivés ---- */

    pub fn avec_aide(mut self, aide: &'static str) -> Self {
        self.aide = aide;
        self
    }

    /// Même jeton sous un autre nom (alias).
    pub fn renomme(&self, nom: &str) -> Self {
        let mut j = self.clone();
        j.nom = nom.to_string();
        j
    }

    /// Crochet constructeur vu comme fonction à un argument (appliquée à la fermeture).
    pub fn enveloppe(&self) -> Option<Jeton> {
        match (&self.genre, &self.operation) {
            (Genre::Ouvrant, Operation::Unaire(f)) => {
                Some(Self::fonction(&self.nom, PREC_IMPLICITE, *f))
            }
            _ => None,
        }
    }

    /* ---- accès ---- */

    pub fn nom(&self) -> &str {
        &self.nom
    }

    pub fn genre(&self) -> Genre {
        self.genre
    }

    pub fn arite(&self) -> usize {
        self.genre.arite()
    }

    pub fn precedence(&self) -> u8 {
        self.precedence
    }

    pub fn associativite(&self) -> Associativite {
        self.associativite
    }

    pub fn fermeture(&self) -> Option<&str> {
        self.fermeture.as_deref()
    }

    pub fn aide(&self) -> &'static str {
        self.aide
    }

    /// Valeur portée (nombre, texte, variable).
    pub fn valeur(&self) -> Option<&Valeur> {
        match &self.operation {
            Operation::Constante(v) => Some(v),
            _ => None,
        }
    }

    /// Applique l’opération ; `args` contient exactement `arite()` valeurs, dans l’ordre.
    pub fn appliquer(&self, mut args: Vec<Valeur>, ctx: Contexte) -> ResultatArith<Sortie> {
        let manquant = || ErreurArith::Domaine(format!("'{}' sans argument", self.nom));

        match &self.operation {
            Operation::Aucune => Ok(Sortie::Plusieurs(args)),
            Operation::Constante(v) => Ok(Sortie::Une(v.arrondie(ctx))),
            Operation::Unaire(f) => {
                let a = args.pop().ok_or_else(manquant)?;
                f(a, ctx).map(Sortie::Une)
            }
            Operation::Binaire(f) => {
                let b = args.pop().ok_or_else(manquant)?;
                let a = args.pop().ok_or_else(manquant)?;
                f(a, b, ctx).map(Sortie::Une)
            }
        }
    }
}

/* ------------------------ Mots → jetons ------------------------ */

/// Convertit les mots d’une instruction en jetons.
/// Ordre : crochets du registre, texte, nombre, registre, environnement, nom inconnu.
/// Avec `noms_differes`, un nom inconnu devient une valeur NomInconnu (erreur à l’usage).
pub fn tokenize(
    mots: &[String],
    registre: &Registre,
    env: &Environnement,
    reglages: &Reglages,
) -> ResultatCalcul<Vec<Jeton>> {
    let mut out = Vec::with_capacity(mots.len());

    for mot in mots {
        // crochets
        if let Some(j) = registre.obtenir(mot).filter(|j| j.genre().est_crochet()) {
            out.push(j.clone());
            continue;
        }

        // texte (guillemets conservés par le découpage)
        if let Some(corps) = mot.strip_prefix('"') {
            let corps = corps.strip_suffix('"').unwrap_or(corps);
            out.push(Jeton::texte(mot, corps));
            continue;
        }

        // nombre (séparateur de groupes retiré)
        if mot.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            let d = mot
                .replace(reglages.separateur_groupes, "")
                .parse::<Decimal>()
                .map_err(|_| ErreurCalcul::NombreInvalide(mot.clone()))?;
            out.push(Jeton::nombre(mot, d));
            continue;
        }

        if let Some(j) = registre.obtenir(mot).or_else(|| env.obtenir(mot)) {
            out.push(j.clone());
            continue;
        }

        if reglages.noms_differes {
            out.push(Jeton::variable(mot, Valeur::NomInconnu(mot.clone())));
        } else {
            return Err(ErreurCalcul::NomInconnu(mot.clone()));
        }
    }

    Ok(out)
}

/// Format utilitaire (traces) : liste de jetons en texte.
pub fn format_jetons(jetons: &[Jeton]) -> String {
    jetons
        .iter()
        .map(|j| match j.genre() {
            Genre::Double => j.nom().replace(' ', ""),
            _ => j.nom().trim().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
