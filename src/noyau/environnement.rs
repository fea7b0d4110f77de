// src/noyau/environnement.rs
//
// Variables de session : nom → jeton Variable portant la valeur.
// "_" (emplacement système) et la variable réponse existent toujours.

use std::collections::HashMap;

use super::jetons::Jeton;
use super::valeur::Valeur;

/// Emplacement système : dernier résultat, listes et aides des commandes.
pub const NOM_SYSTEME: &str = "_";

#[derive(Clone, Debug)]
pub struct Environnement {
    variables: HashMap<String, Jeton>,
    nom_reponse: String,
}

impl Environnement {
    pub fn nouveau(nom_reponse: &str) -> Self {
        let mut env = Self {
            variables: HashMap::new(),
            nom_reponse: nom_reponse.to_string(),
        };
        env.lier(NOM_SYSTEME, Valeur::entier(0));
        env.lier(nom_reponse, Valeur::entier(0));
        env
    }

    pub fn obtenir(&self, nom: &str) -> Option<&Jeton> {
        self.variables.get(nom)
    }

    pub fn contient(&self, nom: &str) -> bool {
        self.variables.contains_key(nom)
    }

    pub fn valeur(&self, nom: &str) -> Option<&Valeur> {
        self.obtenir(nom).and_then(Jeton::valeur)
    }

    /// Crée ou remplace la variable.
    pub fn lier(&mut self, nom: &str, valeur: Valeur) {
        self.variables.insert(nom.to_string(), Jeton::variable(nom, valeur));
    }

    /// Supprime une variable ; "_" et la réponse sont remises à 0.
    /// Renvoie false si le nom n’existait pas.
    pub fn supprimer(&mut self, nom: &str) -> bool {
        if nom == NOM_SYSTEME || nom == self.nom_reponse {
            self.lier(nom, Valeur::entier(0));
            return true;
        }
        self.variables.remove(nom).is_some()
    }

    /// Noms triés, emplacement système exclu.
    pub fn noms(&self) -> Vec<&str> {
        let mut noms: Vec<&str> = self
            .variables
            .keys()
            .map(String::as_str)
            .filter(|n| *n != NOM_SYSTEME)
            .collect();
        noms.sort_unstable();
        noms
    }

    /// (nom, valeur) triés par nom, emplacement système exclu.
    pub fn variables(&self) -> Vec<(&str, &Valeur)> {
        self.noms()
            .into_iter()
            .filter_map(|n| self.valeur(n).map(|v| (n, v)))
            .collect()
    }
}
