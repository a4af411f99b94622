use super::search::linear_search;

/// A category label and the identifiers of its members, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub label: String,
    pub members: Vec<String>,
}

/// Partition `records` by the label `label_of` extracts, collecting the
/// identifier `member_of` extracts.
///
/// Groups come out in first-seen order and members in input order. Member
/// identifiers are neither de-duplicated nor validated.
pub fn group_by<R, K, G>(records: &[R], member_of: K, label_of: G) -> Vec<Group>
where
    K: Fn(&R) -> &str,
    G: Fn(&R) -> &str,
{
    let mut labels: Vec<String> = Vec::new();
    let mut members: Vec<Vec<String>> = Vec::new();

    for record in records {
        let label = label_of(record);
        let member = member_of(record);

        // A Vec is always a sequence, so the search fails only with NotFound
        // or, before the first label is discovered, EmptyInput. Either opens
        // a new group.
        let group_idx = match linear_search(label, &labels) {
            Ok(idx) => idx,
            Err(_) => {
                labels.push(label.to_string());
                members.push(Vec::new());
                labels.len() - 1
            }
        };

        members[group_idx].push(member.to_string());
    }

    labels
        .into_iter()
        .zip(members)
        .map(|(label, members)| Group { label, members })
        .collect()
}
