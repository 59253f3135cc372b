//! Sample API descriptions.

/// A small customer API: three operations across two tags, a path-level parameter list, a
/// schema that references another schema, and a self-referential schema.
pub const CUSTOMERS_SPEC_YAML: &str = r##"openapi: 3.0.3
info:
  title: Customer API
  version: 1.4.0
  description: Manage customers and their addresses.
servers:
  - url: https://sandbox.api.example.com/v1
paths:
  /customers:
    get:
      operationId: listCustomers
      summary: List customers
      tags: [Customer]
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
        - name: offset
          in: query
          schema:
            type: integer
      responses:
        "200":
          description: A page of customers
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: "#/components/schemas/Customer"
    post:
      operationId: createCustomer
      summary: Create a customer
      description: Creates a customer record.
      tags: [Customer]
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: "#/components/schemas/Customer"
      responses:
        "201":
          description: Created
  /customers/{customerId}:
    parameters:
      - name: customerId
        in: path
        required: true
        schema:
          type: string
    get:
      operationId: getCustomer
      summary: Fetch one customer
      tags: [Customer]
      responses:
        "200":
          description: The customer
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Customer"
        "404":
          description: Not found
  /addresses:
    post:
      operationId: createAddress
      summary: Create an address
      tags: [Addresses]
      requestBody:
        content:
          application/json:
            schema:
              $ref: "#/components/schemas/Address"
      responses:
        "201":
          description: Created
  /health:
    get:
      operationId: health
      responses:
        "200":
          description: OK
components:
  schemas:
    Customer:
      type: object
      required: [name]
      properties:
        name:
          type: string
        email:
          type: string
        address:
          $ref: "#/components/schemas/Address"
    Address:
      type: object
      properties:
        line1:
          type: string
        city:
          type: string
    Node:
      type: object
      properties:
        value:
          type: string
        next:
          $ref: "#/components/schemas/Node"
security:
  - apiKey: []
"##;

/// The same shape as JSON, trimmed to a single operation.
pub const PING_SPEC_JSON: &str = r#"{
  "openapi": "3.0.0",
  "info": { "title": "Ping API", "version": "0.1.0" },
  "paths": {
    "/ping": {
      "get": {
        "operationId": "ping",
        "summary": "Ping the service",
        "tags": ["Diagnostics"],
        "responses": { "200": { "description": "pong" } }
      }
    }
  }
}"#;

/// Neither YAML nor JSON.
pub const BROKEN_SPEC: &str = "openapi: [3.0\npaths: {{";
