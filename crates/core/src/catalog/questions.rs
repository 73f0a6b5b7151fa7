use crate::model::{OptionIndex, Question, QuestionSet};

struct Entry {
    prompt: &'static str,
    options: &'static [&'static str],
    correct: OptionIndex,
    explanation: &'static str,
}

const ENTRIES: &[Entry] = &[
    Entry {
        prompt: "Un email prétend venir de Google vous informant d'une connexion suspecte. Que faites-vous en premier ?",
        options: &[
            "Je clique sur le lien pour sécuriser",
            "Je vérifie l'expéditeur et l'URL du lien",
            "Je supprime directement",
        ],
        correct: 1,
        explanation: "Il faut toujours vérifier l'expéditeur et examiner l'URL avant toute action. Google n'envoie jamais d'emails urgents demandant de cliquer immédiatement.",
    },
    Entry {
        prompt: "Quelle est la méthode la plus fiable pour valider un lien ?",
        options: &[
            "Cliquer pour tester",
            "Survoler et observer l'URL",
            "Regarder le logo dans le mail",
        ],
        correct: 1,
        explanation: "Survoler le lien permet de voir la vraie destination sans risquer de cliquer. Les logos peuvent être facilement copiés par les attaquants.",
    },
    Entry {
        prompt: "Vous êtes pressé, vous recevez un fichier partagé depuis un Google Drive externe. Vous :",
        options: &[
            "Ouvrez le lien rapidement",
            "Demandez à l'expéditeur via un autre canal",
            "Supprimez directement",
        ],
        correct: 1,
        explanation: "Même sous pression, il faut toujours vérifier l'authenticité par un canal alternatif (téléphone, chat interne, etc.).",
    },
    Entry {
        prompt: "Quel indice n'est pas suffisant seul pour juger un email comme légitime ?",
        options: &[
            "L'adresse d'expédition est correcte",
            "Le nom de votre entreprise est mentionné",
            "L'email est sans fautes",
        ],
        correct: 1,
        explanation: "Les cybercriminels peuvent facilement mentionner le nom de votre entreprise grâce aux informations publiques disponibles en ligne.",
    },
    Entry {
        prompt: "Quelle faille un hacker peut exploiter après avoir volé un compte Gmail ?",
        options: &[
            "Lecture de mails",
            "Accès aux Drives partagés",
            "Accès aux outils d'admin (ex. newsletters, console admin)",
            "Toutes les réponses",
        ],
        correct: 3,
        explanation: "Un compte Gmail compromis donne accès à tout l'écosystème Google Workspace : mails, Drive, outils admin, historique, contacts...",
    },
    Entry {
        prompt: "Pourquoi certains mails de phishing passent les filtres de Gmail ?",
        options: &[
            "Mauvaise configuration",
            "Les hackers utilisent de vraies boîtes mail compromises",
            "Les liens sont masqués",
            "Toutes les réponses",
        ],
        correct: 3,
        explanation: "Les filtres ne sont pas parfaits. Les attaquants utilisent des comptes légitimes compromis, des techniques d'obfuscation et exploitent les failles de configuration.",
    },
    Entry {
        prompt: "Le lien suivant est visible : https://security.google.com.login.safezone.help/reset — que remarquez-vous ?",
        options: &[
            "Il est sécurisé (https)",
            "Il contient 'google.com'",
            "Ce n'est pas un site Google légitime",
        ],
        correct: 2,
        explanation: "Attention au domaine ! Le vrai domaine est 'safezone.help', pas 'google.com'. C'est une technique classique d'usurpation de domaine.",
    },
    Entry {
        prompt: "Un collègue clique sur un lien de phishing. Quelle est votre priorité ?",
        options: &[
            "Supprimer le mail",
            "Changer son mot de passe",
            "Prévenir l'IT pour blocage et analyse",
        ],
        correct: 2,
        explanation: "L'IT doit être prévenu immédiatement pour bloquer le compte, analyser l'impact et prendre les mesures de sécurité nécessaires.",
    },
    Entry {
        prompt: "Que signifie 'spear phishing' ?",
        options: &[
            "Phishing de masse",
            "Attaque ciblée sur une personne",
            "Virus intégré dans un lien",
        ],
        correct: 1,
        explanation: "Le spear phishing est une attaque hautement personnalisée visant une personne spécifique avec des informations précises sur elle.",
    },
    Entry {
        prompt: "Le phishing peut être combiné avec :",
        options: &[
            "Une usurpation d'identité",
            "Un ransomware",
            "Une fraude au président",
            "Toutes les réponses",
        ],
        correct: 3,
        explanation: "Le phishing est souvent la première étape d'attaques plus complexes : vol d'identité, installation de malwares, fraudes sophistiquées...",
    },
    Entry {
        prompt: "Gmail vous affiche une alerte 'ce message semble dangereux'. Que faites-vous ?",
        options: &[
            "Supprimer immédiatement",
            "Ignorer, c'est sûrement une erreur",
            "Transférer à un collègue pour avis",
        ],
        correct: 0,
        explanation: "Les alertes Gmail sont fiables. Il faut supprimer immédiatement et ne jamais transférer un email suspect à d'autres personnes.",
    },
    Entry {
        prompt: "Vous êtes administrateur Google Workspace. Un utilisateur est compromis. Que faites-vous ?",
        options: &[
            "Le déconnecter de tous les appareils",
            "Forcer un changement de mot de passe",
            "Révoquer les accès Drive et vérifier les logs",
            "Toutes les actions",
        ],
        correct: 3,
        explanation: "En cas de compromission, il faut agir sur tous les fronts : déconnexion, nouveau mot de passe, révocation d'accès et audit complet.",
    },
    Entry {
        prompt: "Pourquoi les cybercriminels ciblent les PME ?",
        options: &[
            "Plus d'argent",
            "Moins de sécurité",
            "Plus de crédulité",
            "B et C",
        ],
        correct: 3,
        explanation: "Les PME ont souvent moins de moyens pour la sécurité et la sensibilisation, ce qui les rend plus vulnérables aux attaques.",
    },
    Entry {
        prompt: "Une attaque par phishing réussie a permis l'accès au compte admin de Google Workspace. Quels sont les impacts potentiels ?",
        options: &[
            "Vol massif de données",
            "Blocage des comptes utilisateurs",
            "Envoi de phishing à toute l'entreprise",
            "Toutes les réponses",
        ],
        correct: 3,
        explanation: "Un compte admin compromis est catastrophique : accès total aux données, possibilité de bloquer les utilisateurs et d'utiliser le système pour propager l'attaque.",
    },
    Entry {
        prompt: "Que signifie 'Zero Trust' face au phishing ?",
        options: &[
            "Ne faire confiance à personne",
            "Appliquer des restrictions d'accès",
            "Valider toutes les connexions",
            "Toutes les réponses",
        ],
        correct: 3,
        explanation: "Zero Trust signifie vérifier systématiquement chaque accès, chaque utilisateur et chaque connexion, même internes.",
    },
];

/// The 15-question final quiz, in presentation order (ids 1..=15).
///
/// # Panics
///
/// Panics if the built-in table is malformed; the unit tests below pin it.
#[must_use]
pub fn reference_questions() -> QuestionSet {
    let questions = ENTRIES
        .iter()
        .zip(1_u32..)
        .map(|(e, id)| {
            Question::new(
                id,
                e.prompt,
                e.options.iter().map(|o| (*o).to_owned()).collect(),
                e.correct,
                e.explanation,
            )
            .expect("built-in question table should be valid")
        })
        .collect();
    QuestionSet::new(questions).expect("built-in question table should be valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_set_has_fifteen_valid_questions() {
        let set = reference_questions();
        assert_eq!(set.total(), 15);
        let ids: Vec<u32> = set.iter().map(Question::id).collect();
        assert_eq!(ids, (1..=15).collect::<Vec<_>>());
    }

    #[test]
    fn correct_answers_match_published_key() {
        let key: Vec<OptionIndex> = reference_questions()
            .iter()
            .map(Question::correct_option)
            .collect();
        assert_eq!(key, vec![1, 1, 1, 1, 3, 3, 2, 2, 1, 3, 0, 3, 3, 3, 3]);
    }
}
