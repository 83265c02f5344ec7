//! GraphQL documents sent to the explorer API

const PROFILE_FIELDS: &str = r#"
fragment ProfileFields on Profile {
  id
  handle
  name
  picture {
    ... on MediaSet {
      original {
        url
      }
    }
    ... on NftImage {
      uri
    }
  }
}
"#;

const TRANSACTION_FIELDS: &str = r#"
fragment TransactionFields on DataAvailabilityTransactionUnion {
  __typename
  ... on DataAvailabilityPost {
    transactionId
    submitter
    createdAt
    appId
    profile {
      ...ProfileFields
    }
    publicationId
  }
  ... on DataAvailabilityComment {
    transactionId
    submitter
    createdAt
    appId
    profile {
      ...ProfileFields
    }
    publicationId
    commentedOnProfile {
      ...ProfileFields
    }
    commentedOnPublicationId
  }
  ... on DataAvailabilityMirror {
    transactionId
    submitter
    createdAt
    appId
    profile {
      ...ProfileFields
    }
    publicationId
    mirrorOfProfile {
      ...ProfileFields
    }
    mirrorOfPublicationId
  }
}
"#;

pub const DA_TRANSACTIONS_OPERATION: &str = "DaTransactions";
pub const DA_TRANSACTION_OPERATION: &str = "DaTransaction";
pub const NEW_TRANSACTION_OPERATION: &str = "NewTransaction";

const DA_TRANSACTIONS_BODY: &str = r#"
query DaTransactions($request: DataAvailabilityTransactionsRequest) {
  dataAvailabilityTransactions(request: $request) {
    items {
      ...TransactionFields
    }
    pageInfo {
      next
    }
  }
}
"#;

const DA_TRANSACTION_BODY: &str = r#"
query DaTransaction($request: DataAvailabilityTransactionRequest!) {
  dataAvailabilityTransaction(request: $request) {
    ...TransactionFields
  }
}
"#;

const NEW_TRANSACTION_BODY: &str = r#"
subscription NewTransaction {
  newDataAvailabilityTransaction {
    ...TransactionFields
  }
}
"#;

fn document(body: &str) -> String {
    format!("{}{}{}", body, TRANSACTION_FIELDS, PROFILE_FIELDS)
}

pub fn da_transactions_query() -> String {
    document(DA_TRANSACTIONS_BODY)
}

pub fn da_transaction_query() -> String {
    document(DA_TRANSACTION_BODY)
}

pub fn new_transaction_subscription() -> String {
    document(NEW_TRANSACTION_BODY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_carry_fragments() {
        for doc in [da_transactions_query(), da_transaction_query(), new_transaction_subscription()] {
            assert!(doc.contains("fragment TransactionFields"));
            assert!(doc.contains("fragment ProfileFields"));
        }
        assert!(new_transaction_subscription().contains("subscription NewTransaction"));
        assert!(da_transactions_query().contains("query DaTransactions"));
    }
}
