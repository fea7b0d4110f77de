// src/noyau/reglages.rs
//
// Réglages de session (serde) : précision, notation, séparateurs, modules.
// Toute valeur lue est ramenée dans ses bornes par `normalise`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::decimal::Contexte;

pub const PRECISION_MIN: u32 = 6;
pub const PRECISION_MAX: u32 = 200;
pub const PRECISION_DEFAUT: u32 = 28;

/// Écart par défaut entre les deux précisions de la double évaluation.
pub const ECART_DEFAUT: u32 = 5;

// Symboles fixes
pub const GUILLEMET: char = '"';
pub const AFFECTATION: &str = "=";
pub const PREFIXE_COMMANDE: &str = "/";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    /// ingénieur entre 5e-10 et 5e12, scientifique au-delà
    #[default]
    Classique,
    Ingenieur,
    Scientifique,
    /// sans exposant
    Normale,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reglages {
    pub precision: u32,
    pub notation: Notation,
    /// Séparateurs décimaux acceptés en entrée ; le premier sert à l’affichage.
    pub separateurs_decimaux: Vec<char>,
    pub separateur_groupes: char,
    /// Séparateur d’affichage des vecteurs, et nom de l’opérateur de jonction.
    pub separateur_vecteur: String,
    pub separateur_instructions: char,
    /// Variable qui reçoit le résultat d’une instruction sans affectation.
    pub nom_reponse: String,
    pub tout_charger: bool,
    pub charger: Vec<String>,
    pub exclure: Vec<String>,
    /// Nom inconnu : erreur à l’usage plutôt qu’à la compilation.
    pub noms_differes: bool,
    pub ecart_verification: u32,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            precision: PRECISION_DEFAUT,
            notation: Notation::Classique,
            separateurs_decimaux: vec!['.'],
            separateur_groupes: '_',
            separateur_vecteur: ",".into(),
            separateur_instructions: ';',
            nom_reponse: "ans".into(),
            tout_charger: true,
            charger: Vec::new(),
            exclure: Vec::new(),
            noms_differes: false,
            ecart_verification: ECART_DEFAUT,
        }
    }
}

impl Reglages {
    /// Bornes et valeurs de repli.
    pub fn normalise(mut self) -> Self {
        self.precision = self.precision.clamp(PRECISION_MIN, PRECISION_MAX);
        if self.separateurs_decimaux.is_empty() {
            self.separateurs_decimaux = vec!['.'];
        }
        if self.separateur_vecteur.is_empty() {
            self.separateur_vecteur = ",".into();
        }
        self.retire_separateurs_en_conflit();
        if self.nom_reponse.is_empty() {
            self.nom_reponse = "ans".into();
        }
        self
    }

    /// Un séparateur décimal ne peut pas être le séparateur de vecteur :
    /// `1,5` serait ambigu. Les séparateurs en conflit sont retirés ; si
    /// aucun ne reste, les deux séparateurs reprennent leur valeur par défaut.
    fn retire_separateurs_en_conflit(&mut self) {
        let mut vecteur = self.separateur_vecteur.chars();
        let (Some(c), None) = (vecteur.next(), vecteur.next()) else {
            return;
        };
        if !self.separateurs_decimaux.contains(&c) {
            return;
        }
        tracing::warn!(separateur = %c, "séparateur décimal identique au séparateur de vecteur, ignoré");
        self.separateurs_decimaux.retain(|&d| d != c);
        if self.separateurs_decimaux.is_empty() {
            let defaut = Self::default();
            self.separateurs_decimaux = defaut.separateurs_decimaux;
            self.separateur_vecteur = defaut.separateur_vecteur;
        }
    }

    pub fn depuis_json(texte: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Reglages>(texte).map(Reglages::normalise)
    }

    /// Lecture d’un fichier JSON ; valeurs par défaut (avec avertissement) en cas d’échec.
    pub fn depuis_fichier(chemin: &Path) -> Self {
        let texte = match std::fs::read_to_string(chemin) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(chemin = %chemin.display(), erreur = %e, "réglages illisibles");
                return Self::default();
            }
        };
        Self::depuis_json(&texte).unwrap_or_else(|e| {
            tracing::warn!(chemin = %chemin.display(), erreur = %e, "réglages invalides");
            Self::default()
        })
    }

    pub fn contexte(&self) -> Contexte {
        Contexte::nouveau(self.precision)
    }

    /// Précision réduite de la double évaluation (jamais sous 1 chiffre).
    pub fn contexte_verification(&self) -> Contexte {
        self.contexte().reduit(self.ecart_verification)
    }

    pub fn separateur_decimal(&self) -> char {
        self.separateurs_decimaux.first().copied().unwrap_or('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_partiel_et_bornes() {
        let r = Reglages::depuis_json(r#"{ "precision": 1000, "notation": "scientifique" }"#)
            .unwrap();
        assert_eq!(r.precision, PRECISION_MAX);
        assert_eq!(r.notation, Notation::Scientifique);
        assert_eq!(r.nom_reponse, "ans");

        let r = Reglages::depuis_json(r#"{ "precision": 2, "separateurs_decimaux": [] }"#).unwrap();
        assert_eq!(r.precision, PRECISION_MIN);
        assert_eq!(r.separateur_decimal(), '.');
    }

    #[test]
    fn separateur_decimal_en_conflit() {
        let r = Reglages::depuis_json(r#"{ "separateurs_decimaux": [",", "."] }"#).unwrap();
        assert_eq!(r.separateurs_decimaux, vec!['.']);
        assert_eq!(r.separateur_vecteur, ",");

        let r = Reglages::depuis_json(r#"{ "separateurs_decimaux": [";"], "separateur_vecteur": ";" }"#)
            .unwrap();
        assert_eq!(r.separateurs_decimaux, vec!['.']);
        assert_eq!(r.separateur_vecteur, ",");

        // virgule décimale possible si le vecteur change de séparateur
        let r = Reglages::depuis_json(r#"{ "separateurs_decimaux": [","], "separateur_vecteur": "|" }"#)
            .unwrap();
        assert_eq!(r.separateur_decimal(), ',');
    }

    #[test]
    fn json_invalide() {
        assert!(Reglages::depuis_json("{ precision: }").is_err());
        assert!(Reglages::depuis_json(r#"{ "notation": "romaine" }"#).is_err());
    }

    #[test]
    fn fichier_absent() {
        let r = Reglages::depuis_fichier(Path::new("/chemin/qui/n/existe/pas.json"));
        assert_eq!(r, Reglages::default());
    }

    #[test]
    fn contexte_de_verification() {
        let r = Reglages {
            precision: 6,
            ecart_verification: 10,
            ..Reglages::default()
        };
        assert_eq!(r.contexte_verification().precision, 1);
    }
}
